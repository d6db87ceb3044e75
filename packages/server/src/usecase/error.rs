//! UseCase 層のエラー

use thiserror::Error;

use crate::domain::{ClientId, RepositoryError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UseCaseError {
    /// The client already left the registry.
    #[error("client {0} is not registered")]
    ClientNotFound(ClientId),
}

impl From<RepositoryError> for UseCaseError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::ClientNotFound(client_id) => UseCaseError::ClientNotFound(client_id),
        }
    }
}

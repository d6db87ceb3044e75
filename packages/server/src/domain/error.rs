//! Domain errors.

use thiserror::Error;

use super::ClientId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("client {0} is not registered")]
    ClientNotFound(ClientId),
}

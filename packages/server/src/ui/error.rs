//! Server-level errors.

use std::io;

use thiserror::Error;
use tumult_shared::protocol::ProtocolError;

use crate::usecase::UseCaseError;

#[derive(Debug, Error)]
pub enum ServerError {
    /// Binding is fatal; the server does not retry or try another port.
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Why a client session ended.
#[derive(Debug, Error)]
pub(crate) enum SessionError {
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    UseCase(#[from] UseCaseError),
}

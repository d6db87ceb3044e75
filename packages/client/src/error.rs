//! Error types for the Tumult client.

use thiserror::Error;
use tumult_shared::{
    address::AddressError,
    protocol::{ConnectionError, ProtocolError},
};

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// The address was rejected before any connection attempt
    #[error("Invalid server address: {0}")]
    InvalidAddress(#[from] AddressError),

    /// Connecting failed or the connection broke
    #[error("Connection error: {0}")]
    Connection(#[from] ConnectionError),

    /// Sending a frame failed
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("Not connected to a server")]
    NotConnected,

    #[error("Already connected to {0}")]
    AlreadyConnected(String),
}

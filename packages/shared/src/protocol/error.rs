//! Error types for the Tumult protocol.

use std::{io, string::FromUtf8Error};

use thiserror::Error;

/// Transport-level failures, both while establishing and during a session.
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("connection timed out")]
    TimedOut,

    #[error("connection was refused")]
    Refused,

    #[error("connection was reset by the peer")]
    Reset,

    #[error("connection was aborted")]
    Aborted,

    /// The peer closed the stream before a complete frame arrived.
    #[error("connection closed by the peer")]
    Closed,

    #[error("connection failed: {0}")]
    Failed(#[source] io::Error),
}

impl From<io::Error> for ConnectionError {
    fn from(error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::TimedOut => ConnectionError::TimedOut,
            io::ErrorKind::ConnectionRefused => ConnectionError::Refused,
            io::ErrorKind::ConnectionReset => ConnectionError::Reset,
            io::ErrorKind::ConnectionAborted | io::ErrorKind::BrokenPipe => {
                ConnectionError::Aborted
            }
            io::ErrorKind::UnexpectedEof => ConnectionError::Closed,
            _ => ConnectionError::Failed(error),
        }
    }
}

/// Failures while reading or writing frames.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    #[error("malformed header: {0}")]
    MalformedHeader(#[from] serde_json::Error),

    #[error("unknown request type code {0}")]
    UnknownRequestType(u8),

    #[error("header exceeds {0} bytes without a delimiter")]
    HeaderTooLarge(usize),

    #[error("payload of {0} bytes exceeds the frame size limit")]
    PayloadTooLarge(usize),

    #[error("payload is not valid UTF-8: {0}")]
    InvalidPayload(#[from] FromUtf8Error),
}

impl ProtocolError {
    /// `true` when the failure came from the transport rather than from decoding.
    pub fn is_disconnect(&self) -> bool {
        matches!(self, ProtocolError::Connection(_))
    }
}

impl From<io::Error> for ProtocolError {
    fn from(error: io::Error) -> Self {
        ProtocolError::Connection(error.into())
    }
}

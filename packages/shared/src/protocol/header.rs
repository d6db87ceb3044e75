//! Header record preceding every frame.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{HEADER_DELIMITER, PROTOCOL_VERSION, ProtocolError};

/// Kind of a frame, carried on the wire as its integer code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestType {
    Message = 1,
    JoinMessage = 2,
    LeaveMessage = 3,
    Nickname = 4,
}

impl RequestType {
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for RequestType {
    type Error = ProtocolError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(RequestType::Message),
            2 => Ok(RequestType::JoinMessage),
            3 => Ok(RequestType::LeaveMessage),
            4 => Ok(RequestType::Nickname),
            other => Err(ProtocolError::UnknownRequestType(other)),
        }
    }
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RequestType::Message => "MESSAGE",
            RequestType::JoinMessage => "JOIN_MESSAGE",
            RequestType::LeaveMessage => "LEAVE_MESSAGE",
            RequestType::Nickname => "NICKNAME",
        };
        f.write_str(name)
    }
}

/// Metadata preceding a frame's payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    pub request_type: RequestType,
    pub version: String,
    /// Seconds since the Unix epoch at which the frame was built.
    pub timestamp: f64,
    pub nickname: Option<String>,
    /// Exact byte length of the payload that follows the header.
    pub content_length: usize,
}

/// On-the-wire shape of a header. Field order is part of the format.
#[derive(Serialize, Deserialize)]
struct HeaderRecord {
    version: String,
    timestamp: f64,
    request_type: u8,
    nickname: Option<String>,
    content_length: usize,
}

impl Header {
    /// Build a header for the current protocol version.
    pub fn new(
        request_type: RequestType,
        nickname: Option<String>,
        content_length: usize,
        timestamp: f64,
    ) -> Self {
        Self {
            request_type,
            version: PROTOCOL_VERSION.to_string(),
            timestamp,
            nickname,
            content_length,
        }
    }

    /// Encode the header as a JSON record terminated by the delimiter.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ProtocolError> {
        let record = HeaderRecord {
            version: self.version.clone(),
            timestamp: self.timestamp,
            request_type: self.request_type.code(),
            nickname: self.nickname.clone(),
            content_length: self.content_length,
        };

        let mut bytes = serde_json::to_vec(&record)?;
        bytes.extend_from_slice(HEADER_DELIMITER);
        Ok(bytes)
    }

    /// Decode a header record. Surrounding whitespace, including the delimiter, is ignored.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ProtocolError> {
        let record: HeaderRecord = serde_json::from_slice(bytes.trim_ascii())?;

        Ok(Self {
            request_type: RequestType::try_from(record.request_type)?,
            version: record.version,
            timestamp: record.timestamp,
            nickname: record.nickname,
            content_length: record.content_length,
        })
    }
}

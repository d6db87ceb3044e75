//! Typed frames written to, and requests read from, a Tumult connection.

use super::{Header, ProtocolError, RequestType};

/// An outgoing frame, one per write call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// Chat text from `nickname`.
    Message {
        nickname: Option<String>,
        text: String,
    },
    /// `nickname` joined the chat.
    Join { nickname: Option<String> },
    /// `nickname` left the chat.
    Leave { nickname: Option<String> },
    /// Nickname solicitation (server to client) or announcement (client to server).
    Nickname { nickname: Option<String> },
}

impl Frame {
    pub fn request_type(&self) -> RequestType {
        match self {
            Frame::Message { .. } => RequestType::Message,
            Frame::Join { .. } => RequestType::JoinMessage,
            Frame::Leave { .. } => RequestType::LeaveMessage,
            Frame::Nickname { .. } => RequestType::Nickname,
        }
    }

    pub fn nickname(&self) -> Option<&str> {
        match self {
            Frame::Message { nickname, .. }
            | Frame::Join { nickname }
            | Frame::Leave { nickname }
            | Frame::Nickname { nickname } => nickname.as_deref(),
        }
    }

    /// Payload bytes. Only messages carry one.
    pub fn payload(&self) -> &[u8] {
        match self {
            Frame::Message { text, .. } => text.as_bytes(),
            _ => &[],
        }
    }
}

/// A frame as read off the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub header: Header,
    pub contents: Vec<u8>,
}

impl Request {
    pub fn request_type(&self) -> RequestType {
        self.header.request_type
    }

    pub fn nickname(&self) -> Option<&str> {
        self.header.nickname.as_deref()
    }

    /// Decode the payload as UTF-8 text.
    pub fn text(&self) -> Result<String, ProtocolError> {
        Ok(String::from_utf8(self.contents.clone())?)
    }

    /// Convert into the typed frame it represents.
    pub fn into_frame(self) -> Result<Frame, ProtocolError> {
        let nickname = self.header.nickname;
        let frame = match self.header.request_type {
            RequestType::Message => Frame::Message {
                nickname,
                text: String::from_utf8(self.contents)?,
            },
            RequestType::JoinMessage => Frame::Join { nickname },
            RequestType::LeaveMessage => Frame::Leave { nickname },
            RequestType::Nickname => Frame::Nickname { nickname },
        };
        Ok(frame)
    }
}

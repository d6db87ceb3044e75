//! History entries.

use tumult_shared::protocol::{Frame, RequestType};

/// A broadcast event as kept in the history log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub nickname: Option<String>,
    pub contents: String,
    pub kind: RequestType,
}

impl Message {
    pub fn chat(nickname: Option<String>, contents: impl Into<String>) -> Self {
        Self {
            nickname,
            contents: contents.into(),
            kind: RequestType::Message,
        }
    }

    pub fn joined(nickname: Option<String>) -> Self {
        Self {
            nickname,
            contents: "joined".to_string(),
            kind: RequestType::JoinMessage,
        }
    }

    pub fn left(nickname: Option<String>) -> Self {
        Self {
            nickname,
            contents: "left".to_string(),
            kind: RequestType::LeaveMessage,
        }
    }

    /// The frame that delivers this entry. Only chat entries carry their contents.
    pub fn to_frame(&self) -> Frame {
        let nickname = self.nickname.clone();
        match self.kind {
            RequestType::JoinMessage => Frame::Join { nickname },
            RequestType::LeaveMessage => Frame::Leave { nickname },
            RequestType::Message | RequestType::Nickname => Frame::Message {
                nickname,
                text: self.contents.clone(),
            },
        }
    }
}

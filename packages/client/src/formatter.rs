//! Message formatting utilities for client display.

use tumult_shared::time::timestamp_to_rfc3339;

use crate::{event::ClientEvent, server_info::ServerInfo};

const RULE: &str = "------------------------------------------------------------";

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format any received event
    pub fn format_event(event: &ClientEvent) -> String {
        match event {
            ClientEvent::MessageReceived {
                nickname,
                text,
                sent_at,
            } => Self::format_chat_message(nickname.as_deref(), text, *sent_at),
            ClientEvent::Joined { nickname, sent_at } => {
                Self::format_joined(nickname.as_deref(), *sent_at)
            }
            ClientEvent::Left { nickname, sent_at } => {
                Self::format_left(nickname.as_deref(), *sent_at)
            }
            ClientEvent::Disconnected => Self::format_disconnected(),
        }
    }

    /// Format a chat message
    ///
    /// # Arguments
    ///
    /// * `from` - Nickname of the sender, if the server stamped one
    /// * `content` - The message content
    /// * `sent_at` - Header timestamp (seconds since the Unix epoch)
    pub fn format_chat_message(from: Option<&str>, content: &str, sent_at: f64) -> String {
        format!(
            "\n\n{RULE}\n@{}: {}\nsent at {}\n{RULE}\n",
            display_name(from),
            content,
            timestamp_to_rfc3339(sent_at)
        )
    }

    /// Format a join notification
    pub fn format_joined(nickname: Option<&str>, at: f64) -> String {
        format!(
            "\n+ {} joined at {}\n",
            display_name(nickname),
            timestamp_to_rfc3339(at)
        )
    }

    /// Format a leave notification
    pub fn format_left(nickname: Option<&str>, at: f64) -> String {
        format!(
            "\n- {} left at {}\n",
            display_name(nickname),
            timestamp_to_rfc3339(at)
        )
    }

    pub fn format_disconnected() -> String {
        "\n! Disconnected from server\n".to_string()
    }

    /// Format the greeting shown once the connection is up
    pub fn format_welcome(server: &ServerInfo) -> String {
        format!(
            "\nConnected to {}. Type messages and press Enter to send.\n\
             /nick <name> changes your nickname, /quit leaves.\n",
            server
        )
    }

    /// Format a usage hint for a malformed command
    pub fn format_usage(usage: &str) -> String {
        format!("usage: {}\n", usage)
    }
}

fn display_name(nickname: Option<&str>) -> &str {
    nickname.unwrap_or("(anonymous)")
}

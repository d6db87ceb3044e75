//! Notifications surfaced to the consuming layer.

/// One received event, delivered exactly once and in receipt order.
///
/// `sent_at` is the header timestamp (seconds since the Unix epoch).
#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    MessageReceived {
        nickname: Option<String>,
        text: String,
        sent_at: f64,
    },
    Joined {
        nickname: Option<String>,
        sent_at: f64,
    },
    Left {
        nickname: Option<String>,
        sent_at: f64,
    },
    /// The connection ended. Nothing follows until the next `connect`.
    Disconnected,
}

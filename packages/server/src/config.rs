//! Server configuration.

use tumult_shared::protocol::{DEFAULT_HOST, DEFAULT_PORT};

use crate::domain::PUSHER_QUEUE_CAPACITY;

/// Whether a chat message is echoed back to the client that sent it.
///
/// Join events always reach every registered client, the joiner included.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum BroadcastPolicy {
    /// Every registered client receives the message, the sender included.
    #[default]
    IncludeSender,
    /// Every registered client except the sender receives the message.
    ExcludeSender,
}

/// Listening address, broadcast behaviour and per-client queue size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub broadcast_policy: BroadcastPolicy,
    /// Frames a client may have pending before it is dropped as too slow.
    pub outbound_queue_capacity: usize,
}

impl ServerConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            broadcast_policy: BroadcastPolicy::default(),
            outbound_queue_capacity: PUSHER_QUEUE_CAPACITY,
        }
    }

    pub fn with_broadcast_policy(mut self, broadcast_policy: BroadcastPolicy) -> Self {
        self.broadcast_policy = broadcast_policy;
        self
    }

    /// Zero is raised to one.
    pub fn with_outbound_queue_capacity(mut self, capacity: usize) -> Self {
        self.outbound_queue_capacity = capacity.max(1);
        self
    }

    /// `host:port` form used in logs and errors.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new(DEFAULT_HOST, DEFAULT_PORT)
    }
}

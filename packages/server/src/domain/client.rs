//! Connected client records.

use std::{fmt, net::SocketAddr};

use tumult_shared::protocol::Frame;

use super::pusher::PusherChannel;

/// Identity of one accepted connection, unique for the server's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClientId(u64);

impl ClientId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A connected client as the server tracks it.
#[derive(Debug, Clone)]
pub struct ClientRecord {
    pub id: ClientId,
    pub address: SocketAddr,
    /// `None` until nickname negotiation completes.
    pub nickname: Option<String>,
    channel: PusherChannel,
}

impl ClientRecord {
    pub fn new(id: ClientId, address: SocketAddr, channel: PusherChannel) -> Self {
        Self {
            id,
            address,
            nickname: None,
            channel,
        }
    }

    pub fn ip_address(&self) -> String {
        self.address.ip().to_string()
    }

    pub fn port(&self) -> u16 {
        self.address.port()
    }

    /// Whether nickname negotiation has completed and a JOIN was announced.
    pub fn has_joined(&self) -> bool {
        self.nickname.is_some()
    }

    /// Enqueue a frame for this client. Returns `false` if its writer is gone
    /// or its queue is full.
    pub fn push(&self, frame: Frame) -> bool {
        self.channel.push(frame)
    }

    pub fn summary(&self) -> ClientSummary {
        ClientSummary {
            id: self.id,
            address: self.address,
            nickname: self.nickname.clone(),
        }
    }
}

impl fmt::Display for ClientRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.address)
    }
}

/// Snapshot of a client record without its outbound channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSummary {
    pub id: ClientId,
    pub address: SocketAddr,
    pub nickname: Option<String>,
}

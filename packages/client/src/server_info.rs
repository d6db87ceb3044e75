//! Server connection information held by the client.

use std::fmt;

use tumult_shared::address::AddressScope;

/// Address of the server the client is connected (or connecting) to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerInfo {
    pub host: Option<String>,
    pub port: Option<u16>,
}

impl ServerInfo {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: Some(host.into()),
            port: Some(port),
        }
    }

    pub fn is_set(&self) -> bool {
        self.host.is_some() && self.port.is_some()
    }

    pub fn address_scope(&self) -> AddressScope {
        AddressScope::of(self.host.as_deref())
    }
}

impl fmt::Display for ServerInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.host, self.port) {
            (Some(host), Some(port)) => write!(f, "{}:{}", host, port),
            _ => f.write_str("(not connected)"),
        }
    }
}

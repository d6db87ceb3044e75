//! Socket address validation and classification.

use std::{fmt, net::Ipv4Addr};

use thiserror::Error;

/// Reasons a host/port pair is rejected before any connection is attempted.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AddressError {
    #[error("'{0}' is not a valid IPv4 address")]
    InvalidHost(String),

    #[error("port {0} is outside 1-65535")]
    InvalidPort(u16),
}

/// Validate a host/port pair as a dotted IPv4 address and a non-zero port.
pub fn validate_socket_address(host: &str, port: u16) -> Result<Ipv4Addr, AddressError> {
    tracing::debug!("Validating socket address {}:{}", host, port);

    let address = host
        .parse::<Ipv4Addr>()
        .map_err(|_| AddressError::InvalidHost(host.to_string()))?;
    if port == 0 {
        return Err(AddressError::InvalidPort(port));
    }

    Ok(address)
}

/// Reachability scope of an IPv4 address, used for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressScope {
    Loopback,
    Private,
    Public,
    Reserved,
    Unknown,
}

impl AddressScope {
    /// Classify a host string. Anything that is not an IPv4 literal is `Unknown`.
    pub fn of(host: Option<&str>) -> Self {
        let Some(address) = host.and_then(|h| h.parse::<Ipv4Addr>().ok()) else {
            return AddressScope::Unknown;
        };

        if address.is_loopback() {
            AddressScope::Loopback
        } else if address.is_private() {
            AddressScope::Private
        } else if address.is_unspecified()
            || address.is_link_local()
            || address.is_broadcast()
            || address.is_documentation()
            || address.is_multicast()
            || address.octets()[0] >= 240
        {
            AddressScope::Reserved
        } else {
            AddressScope::Public
        }
    }
}

impl fmt::Display for AddressScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AddressScope::Loopback => "loopback",
            AddressScope::Private => "private",
            AddressScope::Public => "public",
            AddressScope::Reserved => "reserved",
            AddressScope::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

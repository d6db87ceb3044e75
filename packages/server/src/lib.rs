//! Tumult chat server library.
//!
//! Accepts framed TCP connections, negotiates nicknames, replays message
//! history to new clients and broadcasts messages and presence events.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod config;

pub use config::{BroadcastPolicy, ServerConfig};
pub use ui::{ServerError, TumultServer};

//! Tumult chat client library.
//!
//! [`TumultClient`] connects to a Tumult server, answers its nickname
//! solicitation and surfaces received traffic as [`ClientEvent`]s on a
//! bounded channel. The `session` module is the interactive line client built
//! on top of it.

pub mod client;
pub mod error;
pub mod event;
pub mod formatter;
pub mod server_info;
pub mod session;

mod ui;

pub use client::{EVENT_CHANNEL_CAPACITY, TumultClient};
pub use error::ClientError;
pub use event::ClientEvent;
pub use server_info::ServerInfo;

//! Tumult chat server: accept loop and per-connection sessions.

mod error;
mod handler;
mod server;
mod signal;
pub mod state;

pub use error::ServerError;
pub use server::TumultServer;

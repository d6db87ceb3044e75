//! Shared library for the Tumult chat server and client.
//!
//! Contains the framed wire protocol both sides speak, socket address helpers,
//! and the ambient utilities (logging, clock) used by the binaries.

pub mod address;
pub mod logger;
pub mod protocol;
pub mod time;

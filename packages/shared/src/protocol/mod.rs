//! The Tumult wire protocol.
//!
//! Every frame is a JSON header record terminated by `"\r\n"`, followed by
//! exactly `content_length` bytes of UTF-8 payload. Only MESSAGE frames carry
//! a payload.
//!
//! ```text
//! {"version":"1.0","timestamp":1700000000.5,"request_type":1,"nickname":"User1","content_length":5}\r\n
//! hello
//! ```

mod error;
mod frame;
mod header;
mod socket;

pub use error::{ConnectionError, ProtocolError};
pub use frame::{Frame, Request};
pub use header::{Header, RequestType};
pub use socket::{FramedReader, FramedWriter, bind, connect, split};

/// Protocol version stamped on every header.
pub const PROTOCOL_VERSION: &str = "1.0";

/// Default address the server listens on and the client connects to.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default port the server listens on and the client connects to.
pub const DEFAULT_PORT: u16 = 65535;

/// Two-byte sequence terminating every header record.
pub const HEADER_DELIMITER: &[u8; 2] = b"\r\n";

/// Upper bound on a header record, delimiter included.
pub const MAX_HEADER_LEN: usize = 64 * 1024;

/// Upper bound on a frame payload.
pub const MAX_PAYLOAD_LEN: usize = 1024 * 1024;

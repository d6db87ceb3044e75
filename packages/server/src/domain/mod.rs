//! Domain layer: clients, history entries, and the chat room aggregate.
//!
//! Everything here is synchronous and free of I/O. Delivering a frame means
//! enqueueing it on the client's [`PusherChannel`]; the socket write happens
//! in the connection's writer task.

mod client;
mod error;
mod history;
mod message;
mod nickname;
mod pusher;
mod registry;
mod repository;
mod room;

pub use client::{ClientId, ClientRecord, ClientSummary};
pub use error::RepositoryError;
pub use history::MessageHistory;
pub use message::Message;
pub use nickname::{default_nickname, normalize_nickname};
pub use pusher::{
    PUSHER_QUEUE_CAPACITY, PusherChannel, PusherQueue, pusher_channel, pusher_channel_with_capacity,
};
pub use registry::ClientRegistry;
pub use repository::ChatRepository;
#[cfg(test)]
pub use repository::MockChatRepository;
pub use room::ChatRoom;

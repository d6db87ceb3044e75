//! Repository trait for the chat room.
//!
//! The use case layer depends on this trait only; the infrastructure layer
//! provides the concrete storage.

use async_trait::async_trait;

use super::{ClientId, ClientRecord, ClientSummary, Message, RepositoryError};

/// Access to the shared registry and history.
///
/// Every method is one critical section: implementations serialize all
/// mutations behind a single synchronization point.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatRepository: Send + Sync {
    /// Replay the history to `client` and register it. Returns the replay count.
    async fn register_client(&self, client: ClientRecord) -> usize;

    /// Settle a client's nickname, generating a default for blank requests.
    async fn assign_nickname(
        &self,
        client_id: ClientId,
        requested: Option<String>,
    ) -> Result<String, RepositoryError>;

    /// Change a client's nickname silently.
    /// Returns the stored nickname, or `None` when nothing changed.
    async fn rename_client(
        &self,
        client_id: ClientId,
        requested: Option<String>,
    ) -> Result<Option<String>, RepositoryError>;

    async fn nickname_of(&self, client_id: ClientId) -> Result<Option<String>, RepositoryError>;

    async fn remove_client(&self, client_id: ClientId) -> Result<ClientRecord, RepositoryError>;

    /// Append to the history and enqueue for every registered client.
    /// Returns the number of clients the message was enqueued for.
    async fn broadcast(&self, message: Message, origin: Option<ClientId>) -> usize;

    async fn history(&self) -> Vec<Message>;

    async fn clients(&self) -> Vec<ClientSummary>;
}

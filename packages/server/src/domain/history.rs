//! Append-only log of broadcast events.

use super::{ClientRecord, Message};

/// Every broadcast event in the order it was sent. Never truncated.
#[derive(Debug, Default)]
pub struct MessageHistory {
    entries: Vec<Message>,
}

impl MessageHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, message: Message) {
        self.entries.push(message);
    }

    pub fn entries(&self) -> &[Message] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Enqueue every entry, oldest first, for a single client.
    ///
    /// Returns the number of entries enqueued; stops early if the client's
    /// writer is gone.
    pub fn replay(&self, client: &ClientRecord) -> usize {
        let mut replayed = 0;
        for message in &self.entries {
            if !client.push(message.to_frame()) {
                tracing::warn!("Client {} went away during history replay", client);
                break;
            }
            replayed += 1;
        }
        replayed
    }
}

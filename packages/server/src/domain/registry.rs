//! Ordered collection of connected clients.

use std::net::SocketAddr;

use super::{ClientId, ClientRecord, ClientSummary};

/// Connected clients in connection order.
///
/// Order matters: default nicknames are derived from a client's position.
#[derive(Debug, Default)]
pub struct ClientRegistry {
    clients: Vec<ClientRecord>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, client: ClientRecord) {
        self.clients.push(client);
    }

    pub fn remove(&mut self, client_id: ClientId) -> Option<ClientRecord> {
        let index = self.index_of(client_id)?;
        Some(self.clients.remove(index))
    }

    pub fn get(&self, client_id: ClientId) -> Option<&ClientRecord> {
        self.clients.iter().find(|client| client.id == client_id)
    }

    pub fn get_mut(&mut self, client_id: ClientId) -> Option<&mut ClientRecord> {
        self.clients.iter_mut().find(|client| client.id == client_id)
    }

    /// 1-based position of the client in connection order.
    pub fn position(&self, client_id: ClientId) -> Option<usize> {
        self.index_of(client_id).map(|index| index + 1)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClientRecord> {
        self.clients.iter()
    }

    pub fn list(&self) -> Vec<ClientSummary> {
        self.clients.iter().map(ClientRecord::summary).collect()
    }

    pub fn nicknames(&self) -> Vec<Option<String>> {
        self.clients
            .iter()
            .map(|client| client.nickname.clone())
            .collect()
    }

    pub fn addresses(&self) -> Vec<SocketAddr> {
        self.clients.iter().map(|client| client.address).collect()
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    fn index_of(&self, client_id: ClientId) -> Option<usize> {
        self.clients.iter().position(|client| client.id == client_id)
    }
}

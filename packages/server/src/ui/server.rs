//! Server execution logic.

use std::{future::Future, net::SocketAddr, sync::Arc};

use tokio::{net::TcpListener, sync::Mutex};
use tumult_shared::protocol;

use crate::{
    config::ServerConfig,
    domain::{ChatRepository, ChatRoom, PUSHER_QUEUE_CAPACITY},
    infrastructure::repository::InMemoryChatRepository,
    usecase::{
        ChangeNicknameUseCase, ConnectClientUseCase, DisconnectClientUseCase,
        NegotiateNicknameUseCase, SendMessageUseCase,
    },
};

use super::{error::ServerError, handler::handle_connection, signal::shutdown_signal, state::AppState};

/// Tumult chat server
///
/// Owns the listening socket and the shared state; every accepted connection
/// gets its own task.
///
/// # Example
///
/// ```ignore
/// let server = TumultServer::bind(&ServerConfig::default()).await?;
/// server.start().await?;
/// ```
pub struct TumultServer {
    listener: TcpListener,
    repository: Arc<dyn ChatRepository>,
    state: Arc<AppState>,
    queue_capacity: usize,
}

impl TumultServer {
    /// Bind the listening socket and create an empty in-memory room.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Bind`] if the address cannot be bound.
    pub async fn bind(config: &ServerConfig) -> Result<Self, ServerError> {
        let listener = protocol::bind(&config.host, config.port)
            .await
            .map_err(|source| ServerError::Bind {
                address: config.address(),
                source,
            })?;

        let room = Arc::new(Mutex::new(ChatRoom::new(config.broadcast_policy)));
        let repository = Arc::new(InMemoryChatRepository::new(room));
        Ok(Self::new(listener, repository)
            .with_outbound_queue_capacity(config.outbound_queue_capacity))
    }

    /// Create a server over an already bound listener and repository.
    pub fn new(listener: TcpListener, repository: Arc<dyn ChatRepository>) -> Self {
        let state = Arc::new(AppState {
            connect_client_usecase: Arc::new(ConnectClientUseCase::new(repository.clone())),
            negotiate_nickname_usecase: Arc::new(NegotiateNicknameUseCase::new(
                repository.clone(),
            )),
            send_message_usecase: Arc::new(SendMessageUseCase::new(repository.clone())),
            change_nickname_usecase: Arc::new(ChangeNicknameUseCase::new(repository.clone())),
            disconnect_client_usecase: Arc::new(DisconnectClientUseCase::new(repository.clone())),
        });

        Self {
            listener,
            repository,
            state,
            queue_capacity: PUSHER_QUEUE_CAPACITY,
        }
    }

    /// Frames a client may have pending before it is dropped. Zero is raised to one.
    pub fn with_outbound_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity.max(1);
        self
    }

    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.listener.local_addr()?)
    }

    /// Handle on the registry and history, for inspection.
    pub fn repository(&self) -> Arc<dyn ChatRepository> {
        self.repository.clone()
    }

    /// Accept connections until Ctrl+C.
    pub async fn start(self) -> Result<(), ServerError> {
        self.run_until(shutdown_signal()).await
    }

    /// Accept connections until `shutdown` resolves.
    ///
    /// Accepting never waits on client processing: each connection is
    /// handed to its own task immediately.
    pub async fn run_until<F>(self, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()>,
    {
        tracing::info!("Listening at {}", self.local_addr()?);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        tokio::spawn(handle_connection(
                            stream,
                            peer,
                            self.state.clone(),
                            self.queue_capacity,
                        ));
                    }
                    Err(e) => {
                        tracing::warn!("Failed to accept connection: {}", e);
                    }
                },
                _ = &mut shutdown => break,
            }
        }

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

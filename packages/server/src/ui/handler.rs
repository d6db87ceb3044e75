//! Per-connection session handling.
//!
//! A session moves through four states:
//!
//! 1. Connected: registered, history replayed, nickname requested.
//! 2. AwaitingNickname: frames other than NICKNAME are discarded.
//! 3. Active: NICKNAME renames silently, MESSAGE is broadcast.
//! 4. Disconnecting: entered on any error; removes the client and, if it had
//!    joined, announces its departure.

use std::{net::SocketAddr, sync::Arc};

use tokio::{
    net::{
        TcpStream,
        tcp::{OwnedReadHalf, OwnedWriteHalf},
    },
    task::JoinHandle,
};
use tumult_shared::protocol::{
    ConnectionError, FramedReader, FramedWriter, ProtocolError, RequestType, split,
};

use crate::domain::{ClientId, PusherQueue, pusher_channel_with_capacity};

use super::{error::SessionError, state::AppState};

pub async fn handle_connection(
    stream: TcpStream,
    peer: SocketAddr,
    state: Arc<AppState>,
    queue_capacity: usize,
) {
    tracing::info!("Client connected from {}", peer);

    let (reader, writer) = split(stream);
    let (tx, rx) = pusher_channel_with_capacity(queue_capacity);
    let mut send_task = pusher_loop(rx, writer, peer);

    let client_id = state.connect_client_usecase.execute(peer, tx).await;

    let session_state = state.clone();
    let mut recv_task = tokio::spawn(async move {
        if let Err(e) = run_session(reader, &session_state, client_id, peer).await {
            log_session_end(peer, &e);
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    if let Err(e) = state.disconnect_client_usecase.execute(client_id).await {
        tracing::warn!("Failed to disconnect client {}: {}", peer, e);
    }
}

/// Spawns a task that drains the client's outbound queue into its socket.
///
/// This is the only place the write half is touched, so broadcasting never
/// waits on a socket while holding shared state. The task ends, even in the
/// middle of a stalled write, once the queue overflows.
fn pusher_loop(
    mut rx: PusherQueue,
    mut writer: FramedWriter<OwnedWriteHalf>,
    peer: SocketAddr,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let overflow = rx.overflow_signal();
        let drain = async {
            while let Some(frame) = rx.recv().await {
                if let Err(e) = writer.write_frame(&frame).await {
                    tracing::warn!("Failed to write to client {}: {}", peer, e);
                    break;
                }
            }
        };

        tokio::select! {
            _ = drain => {}
            _ = overflow.notified() => {
                tracing::warn!("Dropping client {}: outbound queue is full", peer);
            }
        }
    })
}

async fn run_session(
    mut reader: FramedReader<OwnedReadHalf>,
    state: &AppState,
    client_id: ClientId,
    peer: SocketAddr,
) -> Result<(), SessionError> {
    let request = reader.wait_for_request(RequestType::Nickname).await?;
    let nickname = state
        .negotiate_nickname_usecase
        .execute(client_id, request.header.nickname)
        .await?;
    tracing::info!("Client {} joined as {}", peer, nickname);

    loop {
        let request = reader.read_request().await?;
        match request.request_type() {
            RequestType::Nickname => {
                state
                    .change_nickname_usecase
                    .execute(client_id, request.header.nickname)
                    .await?;
            }
            RequestType::Message => {
                let text = request.text()?;
                state
                    .send_message_usecase
                    .execute(client_id, text)
                    .await?;
            }
            other => {
                tracing::debug!("Ignoring {} frame from client {}", other, peer);
            }
        }
    }
}

fn log_session_end(peer: SocketAddr, error: &SessionError) {
    match error {
        SessionError::Protocol(ProtocolError::Connection(connection_error)) => {
            match connection_error {
                ConnectionError::TimedOut => {
                    tracing::info!("Connection with client {} timed out", peer)
                }
                ConnectionError::Reset => tracing::info!(
                    "Connection with client {} was forcibly closed by them",
                    peer
                ),
                ConnectionError::Aborted => {
                    tracing::info!("Connection with client {} was aborted", peer)
                }
                ConnectionError::Closed | ConnectionError::Refused => {
                    tracing::info!("Client {} closed the connection", peer)
                }
                ConnectionError::Failed(e) => tracing::error!(
                    "Connection with client {} experienced an error: {}",
                    peer,
                    e
                ),
            }
        }
        SessionError::Protocol(e) => {
            tracing::warn!("Dropping client {} after protocol error: {}", peer, e)
        }
        SessionError::UseCase(e) => tracing::warn!("Session with client {} ended: {}", peer, e),
    }
}

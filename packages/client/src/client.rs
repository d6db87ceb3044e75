//! Connection-oriented chat client.
//!
//! A connected client owns two halves of one socket:
//!
//! - the read half lives in a background task that decodes frames, answers
//!   NICKNAME solicitations and forwards everything else as [`ClientEvent`]s;
//! - the write half is shared (behind a mutex) between that task and the
//!   foreground `send_*` calls, so frames are never interleaved.

use std::sync::Arc;

use tokio::{
    net::tcp::{OwnedReadHalf, OwnedWriteHalf},
    sync::{Mutex, mpsc},
    task::JoinHandle,
};
use tumult_shared::{
    address::validate_socket_address,
    protocol::{self, FramedReader, FramedWriter, ProtocolError, Request, RequestType},
};

use crate::{error::ClientError, event::ClientEvent, server_info::ServerInfo};

/// Capacity of the event channel handed out by [`TumultClient::new`].
pub const EVENT_CHANNEL_CAPACITY: usize = 64;

type SharedWriter = Arc<Mutex<FramedWriter<OwnedWriteHalf>>>;
type SharedNickname = Arc<Mutex<Option<String>>>;

struct Connection {
    writer: SharedWriter,
    read_task: JoinHandle<()>,
}

/// Client handle. Events are delivered on the receiver returned by
/// [`TumultClient::new`], in receipt order and exactly once.
pub struct TumultClient {
    nickname: SharedNickname,
    server: ServerInfo,
    connection: Option<Connection>,
    events: mpsc::Sender<ClientEvent>,
}

impl TumultClient {
    pub fn new() -> (Self, mpsc::Receiver<ClientEvent>) {
        Self::with_capacity(EVENT_CHANNEL_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> (Self, mpsc::Receiver<ClientEvent>) {
        let (events, receiver) = mpsc::channel(capacity);
        let client = Self {
            nickname: Arc::new(Mutex::new(None)),
            server: ServerInfo::default(),
            connection: None,
            events,
        };
        (client, receiver)
    }

    pub fn server(&self) -> &ServerInfo {
        &self.server
    }

    pub async fn nickname(&self) -> Option<String> {
        self.nickname.lock().await.clone()
    }

    /// Set the nickname offered when the server asks for one.
    ///
    /// Does not notify the server; use [`TumultClient::send_nickname`] for that.
    pub async fn set_nickname(&self, nickname: Option<String>) {
        *self.nickname.lock().await = nickname;
    }

    /// `true` while the read loop is still running.
    pub fn is_connected(&self) -> bool {
        self.connection
            .as_ref()
            .is_some_and(|connection| !connection.read_task.is_finished())
    }

    /// Connect to `host:port` and start the read loop.
    ///
    /// A rejected address fails before any connection attempt. A failed
    /// connection attempt emits [`ClientEvent::Disconnected`] and resets the
    /// server address.
    pub async fn connect(&mut self, host: &str, port: u16) -> Result<(), ClientError> {
        if self.is_connected() {
            return Err(ClientError::AlreadyConnected(self.server.to_string()));
        }
        // A read loop that ended on its own leaves its connection behind.
        self.connection = None;

        validate_socket_address(host, port)?;
        self.server = ServerInfo::new(host, port);
        tracing::info!(
            "Connecting to {} ({} address)",
            self.server,
            self.server.address_scope()
        );

        let (reader, writer) = match protocol::connect(host, port).await {
            Ok(halves) => halves,
            Err(e) => {
                tracing::warn!("Failed to connect to {}: {}", self.server, e);
                self.server = ServerInfo::default();
                self.emit(ClientEvent::Disconnected).await;
                return Err(e.into());
            }
        };

        let writer = Arc::new(Mutex::new(writer));
        let read_task = tokio::spawn(read_loop(
            reader,
            writer.clone(),
            self.nickname.clone(),
            self.events.clone(),
        ));
        self.connection = Some(Connection { writer, read_task });

        tracing::info!("Connected to {}", self.server);
        Ok(())
    }

    /// Send one chat message. The server stamps it with our nickname.
    pub async fn send_message(&self, text: &str) -> Result<(), ClientError> {
        let writer = self.writer()?;
        let nickname = self.nickname().await;
        writer
            .lock()
            .await
            .write_message(nickname.as_deref(), text)
            .await?;
        Ok(())
    }

    /// Change the local nickname and announce it to the server.
    pub async fn send_nickname(&self, nickname: impl Into<String>) -> Result<(), ClientError> {
        let writer = self.writer()?;
        let nickname = nickname.into();
        self.set_nickname(Some(nickname.clone())).await;
        writer
            .lock()
            .await
            .write_nickname(Some(&nickname))
            .await?;
        Ok(())
    }

    /// Close the connection and clear the server address and nickname.
    ///
    /// Calling this while disconnected does nothing. No
    /// [`ClientEvent::Disconnected`] is emitted for a local leave.
    pub async fn leave(&mut self) {
        let Some(connection) = self.connection.take() else {
            tracing::debug!("Not connected; nothing to leave");
            return;
        };

        connection.read_task.abort();
        if let Err(e) = connection.writer.lock().await.shutdown().await {
            tracing::debug!("Failed to shut down connection to {}: {}", self.server, e);
        }

        tracing::info!("Left {}", self.server);
        self.server = ServerInfo::default();
        self.set_nickname(None).await;
    }

    fn writer(&self) -> Result<SharedWriter, ClientError> {
        self.connection
            .as_ref()
            .map(|connection| connection.writer.clone())
            .ok_or(ClientError::NotConnected)
    }

    async fn emit(&self, event: ClientEvent) {
        if self.events.send(event).await.is_err() {
            tracing::debug!("Event receiver dropped");
        }
    }
}

impl Drop for TumultClient {
    fn drop(&mut self) {
        if let Some(connection) = self.connection.take() {
            connection.read_task.abort();
        }
    }
}

async fn read_loop(
    mut reader: FramedReader<OwnedReadHalf>,
    writer: SharedWriter,
    nickname: SharedNickname,
    events: mpsc::Sender<ClientEvent>,
) {
    loop {
        let request = match reader.read_request().await {
            Ok(request) => request,
            Err(e) => {
                log_read_end(&e);
                break;
            }
        };

        let event = match to_event(request) {
            Ok(Some(event)) => event,
            Ok(None) => {
                let nickname = nickname.lock().await.clone();
                if let Err(e) = writer
                    .lock()
                    .await
                    .write_nickname(nickname.as_deref())
                    .await
                {
                    log_read_end(&e);
                    break;
                }
                tracing::debug!("Answered nickname request with {:?}", nickname);
                continue;
            }
            Err(e) => {
                log_read_end(&e);
                break;
            }
        };

        if events.send(event).await.is_err() {
            tracing::debug!("Event receiver dropped; stopping read loop");
            return;
        }
    }

    let _ = events.send(ClientEvent::Disconnected).await;
}

/// `None` for a nickname solicitation, which is answered rather than surfaced.
fn to_event(request: Request) -> Result<Option<ClientEvent>, ProtocolError> {
    let sent_at = request.header.timestamp;
    let event = match request.request_type() {
        RequestType::Message => ClientEvent::MessageReceived {
            text: request.text()?,
            nickname: request.header.nickname,
            sent_at,
        },
        RequestType::JoinMessage => ClientEvent::Joined {
            nickname: request.header.nickname,
            sent_at,
        },
        RequestType::LeaveMessage => ClientEvent::Left {
            nickname: request.header.nickname,
            sent_at,
        },
        RequestType::Nickname => return Ok(None),
    };
    Ok(Some(event))
}

fn log_read_end(error: &ProtocolError) {
    if error.is_disconnect() {
        tracing::info!("Connection closed: {}", error);
    } else {
        tracing::warn!("Dropping connection after undecodable frame: {}", error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::{io::AsyncWriteExt, net::TcpListener};

    /// Connect a fresh client to a local listener and return the server's end.
    async fn connect_to_listener() -> (
        TumultClient,
        mpsc::Receiver<ClientEvent>,
        tokio::net::TcpStream,
    ) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let (mut client, events) = TumultClient::new();
        client.connect("127.0.0.1", port).await.unwrap();
        let (stream, _) = listener.accept().await.unwrap();
        (client, events, stream)
    }

    /// Expect exactly one Disconnected, then silence, then a finished read loop.
    async fn assert_disconnected_once(
        client: &TumultClient,
        events: &mut mpsc::Receiver<ClientEvent>,
    ) {
        let event = tokio::time::timeout(Duration::from_secs(1), events.recv())
            .await
            .expect("no Disconnected event");
        assert_eq!(event, Some(ClientEvent::Disconnected));
        assert!(
            tokio::time::timeout(Duration::from_millis(100), events.recv())
                .await
                .is_err()
        );
        tokio::time::timeout(Duration::from_secs(1), async {
            while client.is_connected() {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("read loop kept running");
    }

    #[tokio::test]
    async fn test_new_client_is_disconnected() {
        // テスト項目: 生成直後のクライアントは未接続で、ニックネームもサーバー情報も持たない
        // given (前提条件):
        let (client, _events) = TumultClient::new();

        // then (期待する結果):
        assert!(!client.is_connected());
        assert_eq!(client.nickname().await, None);
        assert!(!client.server().is_set());
    }

    #[tokio::test]
    async fn test_send_message_without_connection_fails() {
        // テスト項目: 未接続でメッセージを送信すると NotConnected になる
        // given (前提条件):
        let (client, _events) = TumultClient::new();

        // when (操作):
        let result = client.send_message("hello").await;

        // then (期待する結果):
        assert!(matches!(result, Err(ClientError::NotConnected)));
    }

    #[tokio::test]
    async fn test_connect_rejects_invalid_host() {
        // テスト項目: 不正なホストは接続を試みる前に拒否され、イベントも発生しない
        // given (前提条件):
        let (mut client, mut events) = TumultClient::new();

        // when (操作):
        let result = client.connect("not-an-address", 65535).await;

        // then (期待する結果):
        assert!(matches!(result, Err(ClientError::InvalidAddress(_))));
        assert!(!client.server().is_set());
        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_connect_failure_emits_disconnected() {
        // テスト項目: 接続に失敗すると Disconnected イベントが発生しサーバー情報がリセットされる
        // given (前提条件):
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        let (mut client, mut events) = TumultClient::new();

        // when (操作):
        let result = client.connect("127.0.0.1", port).await;

        // then (期待する結果):
        assert!(matches!(result, Err(ClientError::Connection(_))));
        assert_eq!(events.recv().await, Some(ClientEvent::Disconnected));
        assert!(!client.server().is_set());
    }

    #[tokio::test]
    async fn test_leave_while_disconnected_keeps_state() {
        // テスト項目: 未接続で leave を呼んでも状態は変わらない
        // given (前提条件):
        let (mut client, mut events) = TumultClient::new();
        client.set_nickname(Some("alice".to_string())).await;

        // when (操作):
        client.leave().await;
        client.leave().await;

        // then (期待する結果):
        assert_eq!(client.nickname().await, Some("alice".to_string()));
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn test_to_event_maps_request_types() {
        // テスト項目: 受信フレームがリクエスト種別に応じたイベントに変換される
        // given (前提条件):
        let header = tumult_shared::protocol::Header::new(
            RequestType::Message,
            Some("alice".to_string()),
            5,
            1.5,
        );
        let request = Request {
            header,
            contents: b"hello".to_vec(),
        };

        // when (操作):
        let event = to_event(request).unwrap();

        // then (期待する結果):
        assert_eq!(
            event,
            Some(ClientEvent::MessageReceived {
                nickname: Some("alice".to_string()),
                text: "hello".to_string(),
                sent_at: 1.5,
            })
        );
    }

    #[test]
    fn test_to_event_maps_leave() {
        // テスト項目: LEAVE フレームは Left イベントになる
        // given (前提条件):
        let header = tumult_shared::protocol::Header::new(
            RequestType::LeaveMessage,
            Some("bob".to_string()),
            4,
            2.0,
        );
        let request = Request {
            header,
            contents: b"left".to_vec(),
        };

        // when (操作):
        let event = to_event(request).unwrap();

        // then (期待する結果):
        assert_eq!(
            event,
            Some(ClientEvent::Left {
                nickname: Some("bob".to_string()),
                sent_at: 2.0,
            })
        );
    }

    #[test]
    fn test_to_event_skips_nickname_request() {
        // テスト項目: NICKNAME フレームはイベントとして通知されない
        // given (前提条件):
        let header =
            tumult_shared::protocol::Header::new(RequestType::Nickname, None, 0, 3.0);
        let request = Request {
            header,
            contents: Vec::new(),
        };

        // when (操作):
        let event = to_event(request).unwrap();

        // then (期待する結果):
        assert_eq!(event, None);
    }

    #[tokio::test]
    async fn test_server_close_emits_disconnected_once() {
        // テスト項目: 接続中にサーバーが切断すると Disconnected が一度だけ届き、未接続状態になる
        // given (前提条件):
        let (client, mut events, stream) = connect_to_listener().await;
        let (reader, mut writer) = protocol::split(stream);
        writer.write_join(Some("alice")).await.unwrap();
        let first = tokio::time::timeout(Duration::from_secs(1), events.recv())
            .await
            .unwrap();
        assert!(matches!(first, Some(ClientEvent::Joined { .. })));
        assert!(client.is_connected());

        // when (操作):
        drop(writer);
        drop(reader);

        // then (期待する結果):
        assert_disconnected_once(&client, &mut events).await;
        assert!(!client.is_connected());
    }

    #[tokio::test]
    async fn test_undecodable_frame_ends_read_loop() {
        // テスト項目: サーバーから解釈できないフレームが届くと Disconnected が一度だけ届き、未接続状態になる
        // given (前提条件):
        let (client, mut events, mut stream) = connect_to_listener().await;

        // when (操作):
        stream.write_all(b"garbage\r\n").await.unwrap();

        // then (期待する結果):
        assert_disconnected_once(&client, &mut events).await;
        assert!(!client.is_connected());
        drop(stream);
    }
}

//! The chat room aggregate: registry plus history.

use tumult_shared::protocol::RequestType;

use crate::config::BroadcastPolicy;

use super::{
    ClientId, ClientRecord, ClientRegistry, Message, MessageHistory, RepositoryError,
    default_nickname, normalize_nickname,
};

/// Connected clients and the broadcast history, mutated as one unit.
///
/// Callers hold a single lock around the room, so joining (registration plus
/// replay) and broadcasting (append plus fan-out) never interleave. Each
/// client therefore sees history and live traffic in one order, with no gap
/// and no duplicate.
#[derive(Debug, Default)]
pub struct ChatRoom {
    registry: ClientRegistry,
    history: MessageHistory,
    broadcast_policy: BroadcastPolicy,
}

impl ChatRoom {
    pub fn new(broadcast_policy: BroadcastPolicy) -> Self {
        Self {
            registry: ClientRegistry::new(),
            history: MessageHistory::new(),
            broadcast_policy,
        }
    }

    pub fn registry(&self) -> &ClientRegistry {
        &self.registry
    }

    pub fn history(&self) -> &MessageHistory {
        &self.history
    }

    /// Replay the history to a new client, then register it.
    ///
    /// Returns the number of history entries replayed.
    pub fn join(&mut self, client: ClientRecord) -> usize {
        let replayed = self.history.replay(&client);
        self.registry.add(client);
        replayed
    }

    /// Settle a client's nickname after negotiation.
    ///
    /// A blank or absent request gets `User<position>`.
    pub fn assign_nickname(
        &mut self,
        client_id: ClientId,
        requested: Option<String>,
    ) -> Result<String, RepositoryError> {
        let position = self
            .registry
            .position(client_id)
            .ok_or(RepositoryError::ClientNotFound(client_id))?;
        let nickname = normalize_nickname(requested).unwrap_or_else(|| default_nickname(position));

        if let Some(client) = self.registry.get_mut(client_id) {
            client.nickname = Some(nickname.clone());
        }
        Ok(nickname)
    }

    /// Change a client's nickname without announcing it.
    ///
    /// Blank requests leave the current nickname in place. Returns the stored
    /// nickname when it changed.
    pub fn rename(
        &mut self,
        client_id: ClientId,
        requested: Option<String>,
    ) -> Result<Option<String>, RepositoryError> {
        let client = self
            .registry
            .get_mut(client_id)
            .ok_or(RepositoryError::ClientNotFound(client_id))?;

        match normalize_nickname(requested) {
            Some(nickname) if client.nickname.as_deref() != Some(nickname.as_str()) => {
                client.nickname = Some(nickname.clone());
                Ok(Some(nickname))
            }
            _ => Ok(None),
        }
    }

    pub fn nickname_of(&self, client_id: ClientId) -> Result<Option<String>, RepositoryError> {
        self.registry
            .get(client_id)
            .map(|client| client.nickname.clone())
            .ok_or(RepositoryError::ClientNotFound(client_id))
    }

    pub fn leave(&mut self, client_id: ClientId) -> Result<ClientRecord, RepositoryError> {
        self.registry
            .remove(client_id)
            .ok_or(RepositoryError::ClientNotFound(client_id))
    }

    /// Append `message` to the history and enqueue it for every registered client.
    ///
    /// `origin` is the client that produced the message; under
    /// [`BroadcastPolicy::ExcludeSender`] it does not receive its own chat
    /// messages. Returns the number of clients the frame was enqueued for.
    pub fn broadcast(&mut self, message: Message, origin: Option<ClientId>) -> usize {
        let skip = match (self.broadcast_policy, message.kind) {
            (BroadcastPolicy::ExcludeSender, RequestType::Message) => origin,
            _ => None,
        };
        let frame = message.to_frame();
        self.history.append(message);

        let mut delivered = 0;
        for client in self.registry.iter() {
            if Some(client.id) == skip {
                continue;
            }
            if client.push(frame.clone()) {
                delivered += 1;
            } else {
                tracing::warn!("Failed to enqueue broadcast for client {}", client);
            }
        }
        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PusherQueue, pusher_channel};
    use tumult_shared::protocol::Frame;

    fn create_test_client(id: u64) -> (ClientRecord, PusherQueue) {
        let (tx, rx) = pusher_channel();
        let address = format!("127.0.0.1:{}", 50000 + id).parse().unwrap();
        (ClientRecord::new(ClientId::new(id), address, tx), rx)
    }

    fn drain(rx: &mut PusherQueue) -> Vec<Frame> {
        let mut frames = Vec::new();
        while let Ok(frame) = rx.try_recv() {
            frames.push(frame);
        }
        frames
    }

    #[test]
    fn test_first_client_without_nickname_becomes_user1() {
        // テスト項目: ニックネーム未指定の最初のクライアントは User1 になる
        // given (前提条件):
        let mut room = ChatRoom::default();
        let (client, mut rx) = create_test_client(1);
        room.join(client);

        // when (操作):
        let nickname = room.assign_nickname(ClientId::new(1), None).unwrap();
        room.broadcast(Message::joined(Some(nickname.clone())), Some(ClientId::new(1)));

        // then (期待する結果):
        assert_eq!(nickname, "User1");
        assert_eq!(room.history().entries(), &[Message::joined(Some("User1".to_string()))]);
        assert_eq!(
            drain(&mut rx),
            vec![Frame::Join {
                nickname: Some("User1".to_string())
            }]
        );
    }

    #[test]
    fn test_supplied_nickname_is_adopted() {
        // テスト項目: クライアントが指定したニックネームが採用される
        // given (前提条件):
        let mut room = ChatRoom::default();
        let (client, _rx) = create_test_client(1);
        room.join(client);

        // when (操作):
        let nickname = room
            .assign_nickname(ClientId::new(1), Some("alice".to_string()))
            .unwrap();

        // then (期待する結果):
        assert_eq!(nickname, "alice");
        assert_eq!(room.nickname_of(ClientId::new(1)), Ok(Some("alice".to_string())));
    }

    #[test]
    fn test_default_nickname_follows_registry_position() {
        // テスト項目: デフォルトのニックネームは登録順の位置から決まる（重複し得る）
        // given (前提条件):
        let mut room = ChatRoom::default();
        let (first, _rx1) = create_test_client(1);
        let (second, _rx2) = create_test_client(2);
        room.join(first);
        room.join(second);
        assert_eq!(room.assign_nickname(ClientId::new(2), None).unwrap(), "User2");

        // when (操作): 1人目が抜けた後に3人目が参加する
        room.leave(ClientId::new(1)).unwrap();
        let (third, _rx3) = create_test_client(3);
        room.join(third);
        let nickname = room.assign_nickname(ClientId::new(3), None).unwrap();

        // then (期待する結果):
        assert_eq!(nickname, "User2");
    }

    #[test]
    fn test_join_replays_history_before_live_traffic() {
        // テスト項目: 新規クライアントは既存の履歴を受け取った後にライブのメッセージを受け取る
        // given (前提条件):
        let mut room = ChatRoom::default();
        let (first, _rx1) = create_test_client(1);
        room.join(first);
        room.broadcast(Message::chat(Some("User1".to_string()), "one"), Some(ClientId::new(1)));
        room.broadcast(Message::chat(Some("User1".to_string()), "two"), Some(ClientId::new(1)));

        // when (操作):
        let (second, mut rx2) = create_test_client(2);
        let replayed = room.join(second);
        room.broadcast(Message::chat(Some("User1".to_string()), "three"), Some(ClientId::new(1)));

        // then (期待する結果):
        assert_eq!(replayed, 2);
        let texts: Vec<String> = drain(&mut rx2)
            .into_iter()
            .filter_map(|frame| match frame {
                Frame::Message { text, .. } => Some(text),
                _ => None,
            })
            .collect();
        assert_eq!(texts, vec!["one", "two", "three"]);
    }

    #[test]
    fn test_broadcast_includes_sender_by_default() {
        // テスト項目: デフォルトでは送信者自身にもメッセージが届く
        // given (前提条件):
        let mut room = ChatRoom::default();
        let (first, mut rx1) = create_test_client(1);
        let (second, mut rx2) = create_test_client(2);
        room.join(first);
        room.join(second);

        // when (操作):
        let delivered = room.broadcast(
            Message::chat(Some("User1".to_string()), "hello"),
            Some(ClientId::new(1)),
        );

        // then (期待する結果):
        let expected = Frame::Message {
            nickname: Some("User1".to_string()),
            text: "hello".to_string(),
        };
        assert_eq!(delivered, 2);
        assert_eq!(drain(&mut rx1), vec![expected.clone()]);
        assert_eq!(drain(&mut rx2), vec![expected]);
    }

    #[test]
    fn test_exclude_sender_policy_skips_only_chat_echo() {
        // テスト項目: 送信者除外ポリシーではチャットのみ送信者に届かない
        // given (前提条件):
        let mut room = ChatRoom::new(BroadcastPolicy::ExcludeSender);
        let (first, mut rx1) = create_test_client(1);
        let (second, mut rx2) = create_test_client(2);
        room.join(first);
        room.join(second);

        // when (操作):
        room.broadcast(Message::joined(Some("User1".to_string())), Some(ClientId::new(1)));
        let delivered = room.broadcast(
            Message::chat(Some("User1".to_string()), "hello"),
            Some(ClientId::new(1)),
        );

        // then (期待する結果):
        assert_eq!(delivered, 1);
        assert_eq!(drain(&mut rx1).len(), 1);
        assert_eq!(drain(&mut rx2).len(), 2);
        assert_eq!(room.history().len(), 2);
    }

    #[test]
    fn test_broadcast_skips_clients_whose_writer_is_gone() {
        // テスト項目: 書き込み側が終了したクライアントへの送信失敗は無視される
        // given (前提条件):
        let mut room = ChatRoom::default();
        let (first, rx1) = create_test_client(1);
        let (second, mut rx2) = create_test_client(2);
        room.join(first);
        room.join(second);
        drop(rx1);

        // when (操作):
        let delivered = room.broadcast(Message::left(Some("User3".to_string())), None);

        // then (期待する結果):
        assert_eq!(delivered, 1);
        assert_eq!(drain(&mut rx2).len(), 1);
    }

    #[test]
    fn test_rename_ignores_blank_nickname() {
        // テスト項目: 空のニックネームによる変更は無視される
        // given (前提条件):
        let mut room = ChatRoom::default();
        let (client, _rx) = create_test_client(1);
        room.join(client);
        room.assign_nickname(ClientId::new(1), Some("alice".to_string()))
            .unwrap();

        // when (操作):
        let blank = room.rename(ClientId::new(1), Some(" ".to_string())).unwrap();
        let changed = room.rename(ClientId::new(1), Some(" alicia ".to_string())).unwrap();
        let unchanged = room.rename(ClientId::new(1), Some("alicia".to_string())).unwrap();

        // then (期待する結果):
        assert_eq!(blank, None);
        assert_eq!(changed, Some("alicia".to_string()));
        assert_eq!(unchanged, None);
        assert_eq!(room.nickname_of(ClientId::new(1)), Ok(Some("alicia".to_string())));
    }

    #[test]
    fn test_operations_on_unknown_client_fail() {
        // テスト項目: 未登録のクライアントに対する操作はエラーになる
        // given (前提条件):
        let mut room = ChatRoom::default();
        let unknown = ClientId::new(42);

        // then (期待する結果):
        assert_eq!(
            room.assign_nickname(unknown, None),
            Err(RepositoryError::ClientNotFound(unknown))
        );
        assert_eq!(
            room.rename(unknown, Some("x".to_string())),
            Err(RepositoryError::ClientNotFound(unknown))
        );
        assert!(room.leave(unknown).is_err());
    }
}

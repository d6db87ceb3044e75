//! InMemory chat repository.
//!
//! Holds the `ChatRoom` aggregate behind one `tokio::sync::Mutex`. Nothing
//! survives a restart.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ChatRepository, ChatRoom, ClientId, ClientRecord, ClientSummary, Message, RepositoryError,
};

pub struct InMemoryChatRepository {
    room: Arc<Mutex<ChatRoom>>,
}

impl InMemoryChatRepository {
    pub fn new(room: Arc<Mutex<ChatRoom>>) -> Self {
        Self { room }
    }
}

#[async_trait]
impl ChatRepository for InMemoryChatRepository {
    async fn register_client(&self, client: ClientRecord) -> usize {
        let mut room = self.room.lock().await;
        let replayed = room.join(client);
        tracing::debug!(
            "Client list updated to {:?}",
            room.registry().addresses()
        );
        replayed
    }

    async fn assign_nickname(
        &self,
        client_id: ClientId,
        requested: Option<String>,
    ) -> Result<String, RepositoryError> {
        let mut room = self.room.lock().await;
        room.assign_nickname(client_id, requested)
    }

    async fn rename_client(
        &self,
        client_id: ClientId,
        requested: Option<String>,
    ) -> Result<Option<String>, RepositoryError> {
        let mut room = self.room.lock().await;
        room.rename(client_id, requested)
    }

    async fn nickname_of(&self, client_id: ClientId) -> Result<Option<String>, RepositoryError> {
        let room = self.room.lock().await;
        room.nickname_of(client_id)
    }

    async fn remove_client(&self, client_id: ClientId) -> Result<ClientRecord, RepositoryError> {
        let mut room = self.room.lock().await;
        let removed = room.leave(client_id)?;
        tracing::debug!(
            "Client list updated to {:?}",
            room.registry().addresses()
        );
        Ok(removed)
    }

    async fn broadcast(&self, message: Message, origin: Option<ClientId>) -> usize {
        let mut room = self.room.lock().await;
        room.broadcast(message, origin)
    }

    async fn history(&self) -> Vec<Message> {
        let room = self.room.lock().await;
        room.history().entries().to_vec()
    }

    async fn clients(&self) -> Vec<ClientSummary> {
        let room = self.room.lock().await;
        room.registry().list()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PusherQueue, pusher_channel};
    use tumult_shared::protocol::Frame;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - InMemoryChatRepository を介した登録・ニックネーム設定・削除・ブロードキャスト
    //
    // 【なぜこのテストが必要か】
    // - Repository は UseCase から呼ばれるデータアクセス層の中核
    // - 並行アクセス時にも登録と履歴の整合性が保たれることを保証する
    // ========================================

    fn create_test_repository() -> InMemoryChatRepository {
        InMemoryChatRepository::new(Arc::new(Mutex::new(ChatRoom::default())))
    }

    fn create_test_client(id: u64) -> (ClientRecord, PusherQueue) {
        let (tx, rx) = pusher_channel();
        let address = format!("127.0.0.1:{}", 50000 + id).parse().unwrap();
        (ClientRecord::new(ClientId::new(id), address, tx), rx)
    }

    #[tokio::test]
    async fn test_register_and_remove_client() {
        // テスト項目: 登録したクライアントが一覧に現れ、削除すると消える
        // given (前提条件):
        let repo = create_test_repository();
        let (client, _rx) = create_test_client(1);

        // when (操作):
        repo.register_client(client).await;
        let registered = repo.clients().await;
        let removed = repo.remove_client(ClientId::new(1)).await.unwrap();

        // then (期待する結果):
        assert_eq!(registered.len(), 1);
        assert_eq!(removed.id, ClientId::new(1));
        assert!(repo.clients().await.is_empty());
    }

    #[tokio::test]
    async fn test_remove_unknown_client_is_error() {
        // テスト項目: 未登録のクライアントを削除するとエラーになる
        // given (前提条件):
        let repo = create_test_repository();

        // when (操作):
        let result = repo.remove_client(ClientId::new(7)).await;

        // then (期待する結果):
        assert!(matches!(
            result,
            Err(RepositoryError::ClientNotFound(id)) if id == ClientId::new(7)
        ));
    }

    #[tokio::test]
    async fn test_concurrent_joins_and_broadcasts_keep_history_consistent() {
        // テスト項目: 並行した参加とブロードキャストでも各クライアントが履歴の欠落・重複なく受信する
        // given (前提条件):
        let repo = Arc::new(create_test_repository());
        let mut receivers = Vec::new();
        let mut tasks = Vec::new();

        // when (操作):
        for id in 1..=8u64 {
            let (client, rx) = create_test_client(id);
            receivers.push(rx);
            let repo = repo.clone();
            tasks.push(tokio::spawn(async move {
                repo.register_client(client).await;
                repo.broadcast(
                    Message::chat(Some(format!("user{}", id)), format!("m{}", id)),
                    Some(ClientId::new(id)),
                )
                .await;
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        // then (期待する結果): 全クライアントが履歴全体を同じ順序で受け取る
        let history: Vec<Frame> = repo.history().await.iter().map(Message::to_frame).collect();
        assert_eq!(history.len(), 8);
        for mut rx in receivers {
            let mut frames = Vec::new();
            while let Ok(frame) = rx.try_recv() {
                frames.push(frame);
            }
            assert_eq!(frames, history);
        }
    }
}

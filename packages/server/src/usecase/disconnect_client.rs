//! UseCase: クライアント切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectClientUseCase::execute() メソッド
//! - レジストリからの削除と LEAVE のブロードキャスト
//!
//! ### どのような状況を想定しているか
//! - 正常系：参加済みクライアントの切断（残りのクライアントに LEAVE が届く）
//! - エッジケース：ニックネーム確定前の切断（JOIN していないので LEAVE も送らない）
//! - 異常系：既に削除済みのクライアント

use std::sync::Arc;

use crate::domain::{ChatRepository, ClientId, Message};

use super::error::UseCaseError;

/// クライアント切断のユースケース
pub struct DisconnectClientUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn ChatRepository>,
}

impl DisconnectClientUseCase {
    /// 新しい DisconnectClientUseCase を作成
    pub fn new(repository: Arc<dyn ChatRepository>) -> Self {
        Self { repository }
    }

    /// クライアント切断を実行
    ///
    /// # Returns
    ///
    /// * `Ok(Some(nickname))` - 参加済みだったクライアント（LEAVE を送信済み）
    /// * `Ok(None)` - ニックネーム確定前に切断したクライアント
    /// * `Err(UseCaseError)` - クライアントが登録されていない
    pub async fn execute(&self, client_id: ClientId) -> Result<Option<String>, UseCaseError> {
        let client = self.repository.remove_client(client_id).await?;
        tracing::info!("Client {} removed from registry", client);

        if !client.has_joined() {
            return Ok(None);
        }

        self.repository
            .broadcast(Message::left(client.nickname.clone()), Some(client_id))
            .await;
        tracing::info!("{} left", client.nickname.as_deref().unwrap_or("-"));

        Ok(client.nickname)
    }
}

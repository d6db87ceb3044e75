//! UseCase: メッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - 送信者のニックネームでのブロードキャストと履歴への追加
//!
//! ### どのような状況を想定しているか
//! - 正常系：接続中の全クライアントへのブロードキャスト
//! - エッジケース：空文字列のメッセージ
//! - 異常系：既に切断済みのクライアントからの送信

use std::sync::Arc;

use crate::domain::{ChatRepository, ClientId, Message};

use super::error::UseCaseError;

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn ChatRepository>,
}

impl SendMessageUseCase {
    /// 新しい SendMessageUseCase を作成
    pub fn new(repository: Arc<dyn ChatRepository>) -> Self {
        Self { repository }
    }

    /// メッセージ送信を実行
    ///
    /// # Arguments
    ///
    /// * `client_id` - 送信者のクライアント ID
    /// * `text` - メッセージ本文
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - メッセージを届けたクライアント数
    /// * `Err(UseCaseError)` - 送信者が登録されていない
    pub async fn execute(&self, client_id: ClientId, text: String) -> Result<usize, UseCaseError> {
        let nickname = self.repository.nickname_of(client_id).await?;
        tracing::info!("{} says {}", nickname.as_deref().unwrap_or("-"), text);

        let delivered = self
            .repository
            .broadcast(Message::chat(nickname, text), Some(client_id))
            .await;
        Ok(delivered)
    }
}

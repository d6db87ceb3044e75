//! UseCase: ニックネーム確定処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - NegotiateNicknameUseCase::execute() メソッド
//! - 要求されたニックネームの採用、またはデフォルト（User<N>）の生成
//! - JOIN のブロードキャストと履歴への追加
//!
//! ### どのような状況を想定しているか
//! - 正常系：ニックネーム指定あり / なし
//! - 異常系：既に切断済みのクライアント

use std::sync::Arc;

use crate::domain::{ChatRepository, ClientId, Message};

use super::error::UseCaseError;

/// ニックネーム確定のユースケース
pub struct NegotiateNicknameUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn ChatRepository>,
}

impl NegotiateNicknameUseCase {
    /// 新しい NegotiateNicknameUseCase を作成
    pub fn new(repository: Arc<dyn ChatRepository>) -> Self {
        Self { repository }
    }

    /// ニックネームを確定し、JOIN をブロードキャストする
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - 確定したニックネーム
    /// * `Err(UseCaseError)` - クライアントが登録されていない
    pub async fn execute(
        &self,
        client_id: ClientId,
        requested: Option<String>,
    ) -> Result<String, UseCaseError> {
        let nickname = self
            .repository
            .assign_nickname(client_id, requested)
            .await?;

        self.repository
            .broadcast(Message::joined(Some(nickname.clone())), Some(client_id))
            .await;
        tracing::info!("{} joined", nickname);

        Ok(nickname)
    }
}

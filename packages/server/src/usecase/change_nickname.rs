//! UseCase: ニックネーム変更処理
//!
//! 接続後に届いた NICKNAME リクエストでニックネームを変更する。
//! 変更はブロードキャストされない。

use std::sync::Arc;

use crate::domain::{ChatRepository, ClientId};

use super::error::UseCaseError;

/// ニックネーム変更のユースケース
pub struct ChangeNicknameUseCase {
    repository: Arc<dyn ChatRepository>,
}

impl ChangeNicknameUseCase {
    pub fn new(repository: Arc<dyn ChatRepository>) -> Self {
        Self { repository }
    }

    /// Returns the stored nickname, or `None` when nothing changed.
    pub async fn execute(
        &self,
        client_id: ClientId,
        requested: Option<String>,
    ) -> Result<Option<String>, UseCaseError> {
        let stored = self
            .repository
            .rename_client(client_id, requested.clone())
            .await?;
        match &stored {
            Some(nickname) => tracing::info!("Client {} is now known as {}", client_id, nickname),
            None => tracing::debug!("Ignored nickname change {:?} for {}", requested, client_id),
        }
        Ok(stored)
    }
}

//! UseCase: クライアント接続処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectClientUseCase::execute() メソッド
//! - クライアントの登録、履歴の再送、ニックネームの要求
//!
//! ### なぜこのテストが必要か
//! - 新規クライアントがライブのメッセージより先に履歴を受け取ることを保証
//! - 接続ごとに一意な ClientId が払い出されることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：履歴が空の状態での接続
//! - 正常系：履歴がある状態での接続（履歴 → ニックネーム要求の順）

use std::{
    net::SocketAddr,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use tumult_shared::protocol::Frame;

use crate::domain::{ChatRepository, ClientId, ClientRecord, PusherChannel};

/// クライアント接続のユースケース
pub struct ConnectClientUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn ChatRepository>,
    /// 直近に払い出した ClientId
    last_client_id: AtomicU64,
}

impl ConnectClientUseCase {
    /// 新しい ConnectClientUseCase を作成
    pub fn new(repository: Arc<dyn ChatRepository>) -> Self {
        Self {
            repository,
            last_client_id: AtomicU64::new(0),
        }
    }

    /// クライアント接続を実行
    ///
    /// 1. クライアントを登録し、これまでの履歴を再送する
    /// 2. ニックネームを要求する NICKNAME フレームを送る
    ///
    /// # Arguments
    ///
    /// * `address` - クライアントのソケットアドレス
    /// * `channel` - クライアントの書き込みタスクへのチャンネル
    ///
    /// # Returns
    ///
    /// 払い出した ClientId
    pub async fn execute(&self, address: SocketAddr, channel: PusherChannel) -> ClientId {
        let client_id = ClientId::new(self.last_client_id.fetch_add(1, Ordering::Relaxed) + 1);

        // 1. 登録と履歴の再送
        let client = ClientRecord::new(client_id, address, channel.clone());
        let replayed = self.repository.register_client(client).await;
        tracing::info!(
            "Sent {} history entries to client {} ({})",
            replayed,
            address,
            client_id
        );

        // 2. ニックネームの要求
        if !channel.push(Frame::Nickname { nickname: None }) {
            tracing::warn!("Client {} went away before nickname request", address);
        }

        client_id
    }
}

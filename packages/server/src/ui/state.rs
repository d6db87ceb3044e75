//! Server state shared by every connection handler.

use std::sync::Arc;

use crate::usecase::{
    ChangeNicknameUseCase, ConnectClientUseCase, DisconnectClientUseCase,
    NegotiateNicknameUseCase, SendMessageUseCase,
};

/// Shared application state
pub struct AppState {
    /// ConnectClientUseCase（クライアント接続のユースケース）
    pub connect_client_usecase: Arc<ConnectClientUseCase>,
    /// NegotiateNicknameUseCase（ニックネーム確定のユースケース）
    pub negotiate_nickname_usecase: Arc<NegotiateNicknameUseCase>,
    /// SendMessageUseCase（メッセージ送信のユースケース）
    pub send_message_usecase: Arc<SendMessageUseCase>,
    /// ChangeNicknameUseCase（ニックネーム変更のユースケース）
    pub change_nickname_usecase: Arc<ChangeNicknameUseCase>,
    /// DisconnectClientUseCase（クライアント切断のユースケース）
    pub disconnect_client_usecase: Arc<DisconnectClientUseCase>,
}

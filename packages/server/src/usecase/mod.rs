//! UseCase 層: サーバーセッションの各操作
//!
//! UI 層（接続ハンドラ）から呼ばれ、Domain 層の `ChatRepository` trait にのみ依存する。

mod change_nickname;
mod connect_client;
mod disconnect_client;
mod error;
mod negotiate_nickname;
mod send_message;

pub use change_nickname::ChangeNicknameUseCase;
pub use connect_client::ConnectClientUseCase;
pub use disconnect_client::DisconnectClientUseCase;
pub use error::UseCaseError;
pub use negotiate_nickname::NegotiateNicknameUseCase;
pub use send_message::SendMessageUseCase;

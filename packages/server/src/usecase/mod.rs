//! UseCase 層
//!
//! 接続・join・チャット・切断の各イベントを 1 つずつ処理するユースケース群。
//! 全ての拒否はワイヤー上では無応答（fail-silent）で、呼び出し側がログに残す。

mod connect_participant;
mod disconnect_participant;
mod error;
mod get_roster;
mod join_participant;
mod send_message;

pub use connect_participant::ConnectParticipantUseCase;
pub use disconnect_participant::DisconnectParticipantUseCase;
pub use error::{ConnectError, JoinError, SendMessageError};
pub use get_roster::{GetRosterUseCase, RosterSnapshot};
pub use join_participant::JoinParticipantUseCase;
pub use send_message::SendMessageUseCase;

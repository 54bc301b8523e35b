//! Database module exports.

pub mod chat_settings;
pub mod stats;
pub mod ticket;
pub mod user;

pub use chat_settings::ChatSettings;
pub use stats::{StatDelta, UserChatStats};
pub use ticket::Ticket;
pub use user::TelegramUser;

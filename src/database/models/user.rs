//! Known Telegram user, as the bot displays them.

use serde::{Deserialize, Serialize};

use crate::dispatch::event::EventUser;

/// A user the bot has seen at least once.
///
/// Display fields are denormalized at write time so rendering a leaderboard
/// or a karma confirmation never needs a live API lookup.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TelegramUser {
    /// Telegram user ID.
    pub user_id: u64,
    /// Plain display name: @username when set, first name otherwise.
    pub user_name: String,
    /// HTML mention link.
    pub user_mention: String,
    /// Unix timestamp of last update.
    pub updated_at: i64,
}

impl TelegramUser {
    pub fn from_event(user: &EventUser) -> Self {
        Self {
            user_id: user.id.0,
            user_name: user.display_name(),
            user_mention: user.mention(),
            updated_at: chrono::Utc::now().timestamp(),
        }
    }
}

//! Per-chat feature toggles.

use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

/// Settings admins can flip per chat.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSettings {
    pub chat_id: i64,
    /// React to messages written with Russian-only letters.
    #[serde(default = "default_true")]
    pub language_watch: bool,
}

impl ChatSettings {
    pub fn new(chat_id: i64) -> Self {
        Self {
            chat_id,
            language_watch: true,
        }
    }
}

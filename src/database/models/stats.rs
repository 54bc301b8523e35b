//! Per-chat reputation counters.

use serde::{Deserialize, Serialize};

/// Counters for one (user, chat) pair.
///
/// Exactly one record exists per pair. Records are created lazily with all
/// counters at zero and are never deleted; `total_messages` and
/// `total_bad_words` only ever grow.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserChatStats {
    pub user_id: u64,
    pub chat_id: i64,
    #[serde(default)]
    pub karma: i64,
    #[serde(default)]
    pub total_messages: u64,
    #[serde(default)]
    pub total_bad_words: u64,
    #[serde(default)]
    pub warns: u32,
    #[serde(default)]
    pub rude_coins: i64,
}

impl UserChatStats {
    pub fn new(user_id: u64, chat_id: i64) -> Self {
        Self {
            user_id,
            chat_id,
            karma: 0,
            total_messages: 0,
            total_bad_words: 0,
            warns: 0,
            rude_coins: 0,
        }
    }
}

/// Field increments applied to a stats record in one atomic step.
///
/// A negative `warns` part only applies while the counter stays at or above
/// zero; a delta that would push it below zero is dropped whole.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatDelta {
    pub karma: i64,
    pub messages: i64,
    pub bad_words: i64,
    pub warns: i64,
    pub rude_coins: i64,
}

impl StatDelta {
    pub fn karma(n: i64) -> Self {
        Self {
            karma: n,
            ..Default::default()
        }
    }

    /// One observed message.
    pub fn message() -> Self {
        Self {
            messages: 1,
            ..Default::default()
        }
    }

    /// One observed message containing `bad_words` flagged words.
    pub fn message_with_bad_words(bad_words: u64) -> Self {
        Self {
            messages: 1,
            bad_words: bad_words as i64,
            ..Default::default()
        }
    }

    pub fn warns(n: i64) -> Self {
        Self {
            warns: n,
            ..Default::default()
        }
    }

    pub fn rude_coins(n: i64) -> Self {
        Self {
            rude_coins: n,
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

//! Chat ticket log entry.

use serde::{Deserialize, Serialize};

/// A short note admins keep against a chat.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    /// Chat-independent, ever-growing id.
    pub ticket_id: i64,
    pub chat_id: i64,
    pub description: String,
    /// Unix timestamp of creation.
    pub created_at: i64,
}

impl Ticket {
    pub fn new(ticket_id: i64, chat_id: i64, description: impl Into<String>) -> Self {
        Self {
            ticket_id,
            chat_id,
            description: description.into(),
            created_at: chrono::Utc::now().timestamp(),
        }
    }
}

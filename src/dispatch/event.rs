//! Transport-independent view of an incoming update.
//!
//! The dispatch engine and every handler work on [`InboundEvent`] instead of
//! raw teloxide types, so the whole pipeline can be driven in tests without
//! a live Telegram connection. The thin adapters in `bot::dispatcher` are the
//! only place events are built from real updates.

use teloxide::types::{ChatId, MessageId, UserId};

use crate::utils::{format_username, user_mention};

/// Structural class of an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// A regular chat message.
    Message,
    /// Service message announcing new chat members.
    NewChatMembers,
    /// An inline keyboard button press.
    CallbackQuery,
}

/// The author of an event, or a referenced user.
#[derive(Debug, Clone)]
pub struct EventUser {
    pub id: UserId,
    pub first_name: String,
    pub username: Option<String>,
    pub is_bot: bool,
}

impl EventUser {
    pub fn new(id: u64, first_name: impl Into<String>) -> Self {
        Self {
            id: UserId(id),
            first_name: first_name.into(),
            username: None,
            is_bot: false,
        }
    }

    /// Plain display name: @username when set, first name otherwise.
    pub fn display_name(&self) -> String {
        format_username(self.username.as_deref(), &self.first_name)
    }

    /// HTML mention link pointing at this user.
    pub fn mention(&self) -> String {
        user_mention(self.id.0, &self.first_name)
    }
}

/// The message an event replies to.
#[derive(Debug, Clone)]
pub struct ReplyTarget {
    pub message_id: MessageId,
    pub from: Option<EventUser>,
}

/// Callback query payload.
#[derive(Debug, Clone)]
pub struct CallbackInfo {
    /// Query id used to answer the callback.
    pub id: String,
    pub data: Option<String>,
}

/// One incoming update, normalized.
#[derive(Debug, Clone)]
pub struct InboundEvent {
    pub kind: EventKind,
    pub chat_id: ChatId,
    /// The triggering message. For callbacks this is the message the
    /// pressed keyboard is attached to.
    pub message_id: MessageId,
    pub from: Option<EventUser>,
    pub text: Option<String>,
    pub reply_to: Option<ReplyTarget>,
    /// True when the message was forwarded from elsewhere.
    pub is_forward: bool,
    pub new_members: Vec<EventUser>,
    pub callback: Option<CallbackInfo>,
}

impl InboundEvent {
    /// A plain text message.
    pub fn message(
        chat_id: ChatId,
        message_id: MessageId,
        from: EventUser,
        text: impl Into<String>,
    ) -> Self {
        Self {
            kind: EventKind::Message,
            chat_id,
            message_id,
            from: Some(from),
            text: Some(text.into()),
            reply_to: None,
            is_forward: false,
            new_members: Vec::new(),
            callback: None,
        }
    }

    /// A service message announcing that users joined the chat.
    pub fn member_join(chat_id: ChatId, message_id: MessageId, members: Vec<EventUser>) -> Self {
        Self {
            kind: EventKind::NewChatMembers,
            chat_id,
            message_id,
            from: None,
            text: None,
            reply_to: None,
            is_forward: false,
            new_members: members,
            callback: None,
        }
    }

    /// A callback query attached to a known message.
    pub fn callback(
        chat_id: ChatId,
        message_id: MessageId,
        from: EventUser,
        callback_id: impl Into<String>,
        data: Option<String>,
    ) -> Self {
        Self {
            kind: EventKind::CallbackQuery,
            chat_id,
            message_id,
            from: Some(from),
            text: None,
            reply_to: None,
            is_forward: false,
            new_members: Vec::new(),
            callback: Some(CallbackInfo {
                id: callback_id.into(),
                data,
            }),
        }
    }

    pub fn with_reply_to(mut self, message_id: MessageId, from: Option<EventUser>) -> Self {
        self.reply_to = Some(ReplyTarget { message_id, from });
        self
    }

    pub fn forwarded(mut self) -> Self {
        self.is_forward = true;
        self
    }

    pub fn callback_data(&self) -> Option<&str> {
        self.callback.as_ref().and_then(|c| c.data.as_deref())
    }
}

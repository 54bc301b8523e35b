//! Telegram transport seam.
//!
//! Handlers talk to the chat through [`ChatApi`] instead of calling teloxide
//! request builders directly. The production implementation wraps the
//! throttled bot; tests substitute a recording mock.

use anyhow::Context;
use async_trait::async_trait;
use teloxide::adaptors::Throttle;
use teloxide::prelude::*;
use teloxide::types::{
    ChatMemberKind, InlineKeyboardButton, InlineKeyboardMarkup, InputFile, MessageId, ParseMode,
    ReplyParameters,
};

/// Bot type with Throttle adaptor for automatic rate limiting.
pub type ThrottledBot = Throttle<Bot>;

/// What a chat member is allowed to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberRole {
    Owner,
    Admin,
    Member,
}

impl MemberRole {
    /// Owners count as admins everywhere.
    pub fn is_admin(self) -> bool {
        matches!(self, MemberRole::Owner | MemberRole::Admin)
    }
}

/// One inline keyboard button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Button {
    Url { label: String, url: String },
    Callback { label: String, data: String },
}

impl Button {
    pub fn url(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self::Url {
            label: label.into(),
            url: url.into(),
        }
    }

    pub fn callback(label: impl Into<String>, data: impl Into<String>) -> Self {
        Self::Callback {
            label: label.into(),
            data: data.into(),
        }
    }
}

/// Options applied to an outgoing message.
#[derive(Debug, Clone, Default)]
pub struct SendOptions {
    pub reply_to: Option<MessageId>,
    /// Inline keyboard rows. Empty means no keyboard.
    pub keyboard: Vec<Vec<Button>>,
}

impl SendOptions {
    pub fn reply_to(message_id: MessageId) -> Self {
        Self {
            reply_to: Some(message_id),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_keyboard(mut self, rows: Vec<Vec<Button>>) -> Self {
        self.keyboard = rows;
        self
    }
}

/// Outgoing side of the Telegram connection.
///
/// Every method returns the id of the sent message so handlers can schedule
/// cleanup for it. All text is sent as HTML.
#[async_trait]
pub trait ChatApi: Send + Sync {
    async fn send_text(
        &self,
        chat_id: ChatId,
        text: &str,
        opts: SendOptions,
    ) -> anyhow::Result<MessageId>;

    async fn send_photo(
        &self,
        chat_id: ChatId,
        url: &str,
        opts: SendOptions,
    ) -> anyhow::Result<MessageId>;

    async fn send_video(
        &self,
        chat_id: ChatId,
        url: &str,
        opts: SendOptions,
    ) -> anyhow::Result<MessageId>;

    async fn send_animation(
        &self,
        chat_id: ChatId,
        url: &str,
        caption: &str,
        opts: SendOptions,
    ) -> anyhow::Result<MessageId>;

    async fn delete_message(&self, chat_id: ChatId, message_id: MessageId) -> anyhow::Result<()>;

    async fn answer_callback(
        &self,
        callback_id: &str,
        text: &str,
        show_alert: bool,
    ) -> anyhow::Result<()>;

    async fn member_role(&self, chat_id: ChatId, user_id: UserId) -> anyhow::Result<MemberRole>;
}

/// Production [`ChatApi`] over the throttled bot.
#[derive(Clone)]
pub struct TelegramApi {
    bot: ThrottledBot,
}

impl TelegramApi {
    pub fn new(bot: ThrottledBot) -> Self {
        Self { bot }
    }
}

/// Convert keyboard rows to teloxide markup. Buttons with an unparseable
/// URL are dropped, matching how dynamic keyboards degrade elsewhere.
fn to_markup(rows: &[Vec<Button>]) -> Option<InlineKeyboardMarkup> {
    if rows.is_empty() {
        return None;
    }

    let keyboard: Vec<Vec<InlineKeyboardButton>> = rows
        .iter()
        .map(|row| {
            row.iter()
                .filter_map(|btn| match btn {
                    Button::Url { label, url } => url
                        .parse()
                        .ok()
                        .map(|url| InlineKeyboardButton::url(label.clone(), url)),
                    Button::Callback { label, data } => {
                        Some(InlineKeyboardButton::callback(label.clone(), data.clone()))
                    }
                })
                .collect()
        })
        .filter(|row: &Vec<_>| !row.is_empty())
        .collect();

    if keyboard.is_empty() {
        None
    } else {
        Some(InlineKeyboardMarkup::new(keyboard))
    }
}

#[async_trait]
impl ChatApi for TelegramApi {
    async fn send_text(
        &self,
        chat_id: ChatId,
        text: &str,
        opts: SendOptions,
    ) -> anyhow::Result<MessageId> {
        let mut req = self
            .bot
            .send_message(chat_id, text)
            .parse_mode(ParseMode::Html);
        if let Some(reply_to) = opts.reply_to {
            req = req.reply_parameters(ReplyParameters::new(reply_to));
        }
        if let Some(kb) = to_markup(&opts.keyboard) {
            req = req.reply_markup(kb);
        }
        let msg = req.await?;
        Ok(msg.id)
    }

    async fn send_photo(
        &self,
        chat_id: ChatId,
        url: &str,
        opts: SendOptions,
    ) -> anyhow::Result<MessageId> {
        let file = InputFile::url(url.parse().with_context(|| format!("bad photo url: {url}"))?);
        let mut req = self.bot.send_photo(chat_id, file);
        if let Some(reply_to) = opts.reply_to {
            req = req.reply_parameters(ReplyParameters::new(reply_to));
        }
        if let Some(kb) = to_markup(&opts.keyboard) {
            req = req.reply_markup(kb);
        }
        let msg = req.await?;
        Ok(msg.id)
    }

    async fn send_video(
        &self,
        chat_id: ChatId,
        url: &str,
        opts: SendOptions,
    ) -> anyhow::Result<MessageId> {
        let file = InputFile::url(url.parse().with_context(|| format!("bad video url: {url}"))?);
        let mut req = self.bot.send_video(chat_id, file);
        if let Some(reply_to) = opts.reply_to {
            req = req.reply_parameters(ReplyParameters::new(reply_to));
        }
        if let Some(kb) = to_markup(&opts.keyboard) {
            req = req.reply_markup(kb);
        }
        let msg = req.await?;
        Ok(msg.id)
    }

    async fn send_animation(
        &self,
        chat_id: ChatId,
        url: &str,
        caption: &str,
        opts: SendOptions,
    ) -> anyhow::Result<MessageId> {
        let file =
            InputFile::url(url.parse().with_context(|| format!("bad animation url: {url}"))?);
        let mut req = self
            .bot
            .send_animation(chat_id, file)
            .caption(caption)
            .parse_mode(ParseMode::Html);
        if let Some(reply_to) = opts.reply_to {
            req = req.reply_parameters(ReplyParameters::new(reply_to));
        }
        if let Some(kb) = to_markup(&opts.keyboard) {
            req = req.reply_markup(kb);
        }
        let msg = req.await?;
        Ok(msg.id)
    }

    async fn delete_message(&self, chat_id: ChatId, message_id: MessageId) -> anyhow::Result<()> {
        self.bot.delete_message(chat_id, message_id).await?;
        Ok(())
    }

    async fn answer_callback(
        &self,
        callback_id: &str,
        text: &str,
        show_alert: bool,
    ) -> anyhow::Result<()> {
        self.bot
            .answer_callback_query(callback_id.to_string())
            .text(text)
            .show_alert(show_alert)
            .await?;
        Ok(())
    }

    async fn member_role(&self, chat_id: ChatId, user_id: UserId) -> anyhow::Result<MemberRole> {
        let member = self.bot.get_chat_member(chat_id, user_id).await?;
        let role = match member.kind {
            ChatMemberKind::Owner(_) => MemberRole::Owner,
            ChatMemberKind::Administrator(_) => MemberRole::Admin,
            _ => MemberRole::Member,
        };
        Ok(role)
    }
}

//! Shared test doubles: a recording chat API, stub external services and
//! a fully wired engine over in-memory storage.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use teloxide::types::{ChatId, MessageId, UserId};

use rudecat::cache::CacheRegistry;
use rudecat::database::Storage;
use rudecat::dispatch::cleanup::CleanupScheduler;
use rudecat::dispatch::{DispatchEngine, HandlerContext};
use rudecat::handlers::onboarding::JoinTracker;
use rudecat::handlers::build_registry;
use rudecat::leaderboard::{LeaderboardAggregator, ProcessGate, RenderGate};
use rudecat::permissions::RoleChecker;
use rudecat::services::{CatService, CompletionService, Services, TickerService};
use rudecat::telegram::{Button, ChatApi, MemberRole, SendOptions};

/// Fixed id the engine is built with, for reply-to-bot scenarios.
pub const BOT_USER_ID: u64 = 999_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentKind {
    Text,
    Photo,
    Video,
    Animation,
}

/// One outgoing message as the mock recorded it.
#[derive(Debug, Clone)]
pub struct SentMessage {
    pub kind: SentKind,
    pub chat_id: i64,
    pub message_id: i32,
    /// Message text, caption, or media URL depending on kind.
    pub text: String,
    pub reply_to: Option<i32>,
    pub keyboard: Vec<Vec<Button>>,
}

/// Recording [`ChatApi`] double.
#[derive(Default)]
pub struct MockApi {
    next_id: AtomicI32,
    pub sent: Mutex<Vec<SentMessage>>,
    pub deleted: Mutex<Vec<(i64, i32)>>,
    /// (callback id, text, alert flag)
    pub answered: Mutex<Vec<(String, String, bool)>>,
    pub admins: Mutex<HashSet<u64>>,
}

impl MockApi {
    pub fn new() -> Self {
        Self {
            next_id: AtomicI32::new(1000),
            ..Default::default()
        }
    }

    pub fn grant_admin(&self, user_id: u64) {
        self.admins.lock().unwrap().insert(user_id);
    }

    fn record(&self, kind: SentKind, chat_id: ChatId, text: &str, opts: SendOptions) -> MessageId {
        let message_id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.sent.lock().unwrap().push(SentMessage {
            kind,
            chat_id: chat_id.0,
            message_id,
            text: text.to_string(),
            reply_to: opts.reply_to.map(|m| m.0),
            keyboard: opts.keyboard,
        });
        MessageId(message_id)
    }

    pub fn sent_messages(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub fn last_sent(&self) -> SentMessage {
        self.sent.lock().unwrap().last().expect("nothing was sent").clone()
    }

    pub fn deleted_messages(&self) -> Vec<(i64, i32)> {
        self.deleted.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatApi for MockApi {
    async fn send_text(&self, chat_id: ChatId, text: &str, opts: SendOptions) -> Result<MessageId> {
        Ok(self.record(SentKind::Text, chat_id, text, opts))
    }

    async fn send_photo(&self, chat_id: ChatId, url: &str, opts: SendOptions) -> Result<MessageId> {
        Ok(self.record(SentKind::Photo, chat_id, url, opts))
    }

    async fn send_video(&self, chat_id: ChatId, url: &str, opts: SendOptions) -> Result<MessageId> {
        Ok(self.record(SentKind::Video, chat_id, url, opts))
    }

    async fn send_animation(
        &self,
        chat_id: ChatId,
        url: &str,
        caption: &str,
        opts: SendOptions,
    ) -> Result<MessageId> {
        let _ = url;
        Ok(self.record(SentKind::Animation, chat_id, caption, opts))
    }

    async fn delete_message(&self, chat_id: ChatId, message_id: MessageId) -> Result<()> {
        self.deleted.lock().unwrap().push((chat_id.0, message_id.0));
        Ok(())
    }

    async fn answer_callback(&self, callback_id: &str, text: &str, show_alert: bool) -> Result<()> {
        self.answered
            .lock()
            .unwrap()
            .push((callback_id.to_string(), text.to_string(), show_alert));
        Ok(())
    }

    async fn member_role(&self, _chat_id: ChatId, user_id: UserId) -> Result<MemberRole> {
        if self.admins.lock().unwrap().contains(&user_id.0) {
            Ok(MemberRole::Admin)
        } else {
            Ok(MemberRole::Member)
        }
    }
}

/// Stub cat source: `Some` URL or a failing fetch.
pub struct StubCats(pub Option<String>);

#[async_trait]
impl CatService for StubCats {
    async fn random_cat_url(&self) -> Result<String> {
        self.0.clone().ok_or_else(|| anyhow::anyhow!("cats are out"))
    }
}

/// Stub quote source.
pub struct StubTicker(pub Option<f64>);

#[async_trait]
impl TickerService for StubTicker {
    async fn price(&self, _symbol: &str) -> Result<f64> {
        self.0.ok_or_else(|| anyhow::anyhow!("market is closed"))
    }
}

/// Stub completion backend.
pub struct StubCompletions(pub Option<String>);

#[async_trait]
impl CompletionService for StubCompletions {
    async fn complete(&self, _prompt: &str) -> Result<String> {
        self.0.clone().ok_or_else(|| anyhow::anyhow!("no API key configured"))
    }
}

/// All stubs failing, the worst day for external services.
pub fn failing_services() -> Services {
    Services {
        cats: Arc::new(StubCats(None)),
        ticker: Arc::new(StubTicker(None)),
        completions: Arc::new(StubCompletions(None)),
    }
}

/// An engine over in-memory storage and the recording API.
pub struct TestBot {
    pub api: Arc<MockApi>,
    pub storage: Storage,
    pub joins: Arc<JoinTracker>,
    pub cleanup: CleanupScheduler,
    pub engine: DispatchEngine,
}

pub fn test_bot() -> TestBot {
    test_bot_with_gate(Arc::new(ProcessGate::new()))
}

pub fn test_bot_with_gate(gate: Arc<dyn RenderGate>) -> TestBot {
    let api = Arc::new(MockApi::new());
    let storage = Storage::in_memory();
    let cache = CacheRegistry::new();
    let joins = Arc::new(JoinTracker::new());
    let cleanup = CleanupScheduler::new(api.clone());

    let ctx = HandlerContext {
        api: api.clone(),
        storage: storage.clone(),
        roles: RoleChecker::new(api.clone(), &cache),
        leaderboard: Arc::new(LeaderboardAggregator::new(storage.clone(), gate)),
        joins: joins.clone(),
        cleanup: cleanup.clone(),
        services: failing_services(),
    };

    let registry = build_registry(UserId(BOT_USER_ID)).expect("trigger table must build");

    TestBot {
        api,
        storage,
        joins,
        cleanup: ctx.cleanup.clone(),
        engine: DispatchEngine::new(registry, ctx),
    }
}

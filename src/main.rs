use std::sync::Arc;

use teloxide::adaptors::throttle::Limits;
use teloxide::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

use rudecat::cache::CacheRegistry;
use rudecat::config::Config;
use rudecat::database::Storage;
use rudecat::dispatch::cleanup::CleanupScheduler;
use rudecat::dispatch::{DispatchEngine, HandlerContext};
use rudecat::handlers::{self, onboarding::JoinTracker};
use rudecat::leaderboard::{LeaderboardAggregator, ProcessGate};
use rudecat::permissions::RoleChecker;
use rudecat::services::Services;
use rudecat::telegram::TelegramApi;
use rudecat::{bot, texts};

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("rudecat=info,teloxide=warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting Rudecat v{}...", texts::BOT_VERSION);

    let config = Config::from_env();
    info!("Configuration loaded, mode: {:?}", config.bot_mode);

    let cache = CacheRegistry::new();
    let storage = Storage::connect(&config, &cache).await?;

    // Throttle keeps us inside Telegram's send limits without any handler
    // having to think about it.
    let bot = Bot::new(&config.bot_token).throttle(Limits::default());
    let me = bot.get_me().await?;
    info!("Bot username: @{}", me.username());

    let api = Arc::new(TelegramApi::new(bot.clone()));
    let services = Services::http(config.openai_api_key.clone())?;
    if config.openai_api_key.is_none() {
        info!("OPENAI_API_KEY not set, ask trigger will answer with the fallback text");
    }

    // The aggregator reads through the same storage handlers write to.
    let leaderboard = Arc::new(LeaderboardAggregator::new(
        storage.clone(),
        Arc::new(ProcessGate::new()),
    ));

    let ctx = HandlerContext {
        api: api.clone(),
        storage,
        roles: RoleChecker::new(api.clone(), &cache),
        leaderboard,
        joins: Arc::new(JoinTracker::new()),
        cleanup: CleanupScheduler::new(api),
        services,
    };

    let registry = handlers::build_registry(me.id)?;
    info!("Trigger registry built with {} triggers", registry.len());

    let engine = Arc::new(DispatchEngine::new(registry, ctx));
    let dispatcher = bot::build_dispatcher(bot.clone(), engine);

    bot::run(&config, dispatcher, bot).await;

    Ok(())
}

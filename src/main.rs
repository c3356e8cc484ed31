//! Telehost - Multi-tenant Telegram Bot Hosting Platform
//!
//! Users talk to a manager bot to deploy their own bots; the platform
//! operates hosted bots in-process, tracks per-bot statistics, enforces
//! rate limits and channel-membership gating, and gives platform admins
//! analytics and broadcast tooling. Bilingual UI (English / Arabic).
//!
//! ## Architecture
//!
//! - `config` - Environment configuration
//! - `database` - MongoDB integration
//! - `cache` - LRU-based caching with Moka
//! - `i18n` - Embedded EN/AR string tables
//! - `guards` - Rate limiting and channel-membership gating
//! - `registry` - Live hosted bot instances (lazy loading)
//! - `hosted` - Built-in behaviors for hosted bots (service/contact)
//! - `bot` - Manager bot dispatcher, runtime and webhook server
//! - `plugins` - Manager command handlers
//! - `utils` - Utility functions

mod bot;
mod cache;
mod config;
mod database;
mod guards;
mod hosted;
mod i18n;
mod plugins;
mod registry;
mod utils;

use std::sync::Arc;

use teloxide::adaptors::throttle::Limits;
use teloxide::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cache::CacheRegistry;
use config::Config;
use database::Database;
use registry::BotRegistry;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file first (before anything else)
    dotenvy::dotenv().ok();

    // Initialize logging with sensible defaults
    // If RUST_LOG is not set, default to "info" level for our crate
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("telehost=info,teloxide=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .init();

    info!("Starting Telehost platform...");

    // Load configuration
    let config = Config::from_env();
    info!("Configuration loaded successfully");
    info!("Bot mode: {:?}", config.bot_mode);

    // Load embedded translations (EN/AR)
    i18n::init();

    // Connect to MongoDB
    info!("Connecting to MongoDB...");
    let db = Database::connect(&config.mongodb_uri, &config.mongodb_database).await?;
    let db = Arc::new(db);
    info!("Database connected");

    // Initialize cache registry
    let cache = Arc::new(CacheRegistry::new());

    // Initialize the manager bot with Throttle for automatic rate limiting
    // This respects Telegram's rate limits:
    // - 30 messages per second globally
    // - 1 message per second to the same chat
    let bot = Bot::new(&config.main_bot_token).throttle(Limits::default());
    info!("Manager bot initialized with rate limiting (Throttle)");

    // Get bot info
    let me = bot.get_me().await?;
    info!("Manager bot username: @{}", me.username());

    // Log admin info
    if config.admin_ids.is_empty() {
        info!("No admin IDs configured (ADMIN_IDS is empty)");
    } else {
        info!("Platform admins: {:?}", config.admin_ids);
    }

    // Registry of live hosted bot instances
    let hosted = Arc::new(BotRegistry::new(config.clone()));

    // Shared state and dispatcher
    let state = bot::AppState::new(db.clone(), cache, hosted, config.clone());
    let dispatcher = bot::build_dispatcher(bot.clone(), state.clone());

    // Seed default service content, then reload previously hosted bots in
    // the background so startup is not blocked by one getMe call per bot.
    db.seed_service_content().await?;
    bot::spawn_bot_reload(state.clone());

    // Register the manager bot's command list (the "blue menu" button)
    bot::set_manager_commands(&bot).await;

    // Run the bot
    bot::run(&config, dispatcher, bot, state).await;

    Ok(())
}

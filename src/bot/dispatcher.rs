//! Message dispatcher setup.
//!
//! Builds the dispatcher with all command, session and callback handlers.

use std::sync::Arc;

use teloxide::adaptors::Throttle;
use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use tracing::debug;

use crate::cache::{CacheConfig, CacheRegistry, TypedCache};
use crate::config::Config;
use crate::database::{AuditRepo, BotRepo, ContentRepo, Database, StatsRepo, UserRepo};
use crate::guards::{self, ActionTracker, ChannelGate};
use crate::hosted::HostedCtx;
use crate::plugins::{self, PendingAction};
use crate::registry::BotRegistry;

/// Bot type with Throttle adaptor for automatic rate limiting.
pub type ThrottledBot = Throttle<Bot>;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Database connection.
    pub db: Arc<Database>,

    /// Cache registry for creating/accessing caches.
    pub cache: Arc<CacheRegistry>,

    /// Platform configuration.
    pub config: Config,

    /// Platform user repository.
    pub users: Arc<UserRepo>,

    /// Hosted bot registrations.
    pub bots: Arc<BotRepo>,

    /// Daily per-bot statistics.
    pub stats: Arc<StatsRepo>,

    /// Audit trail of platform actions.
    pub audit: Arc<AuditRepo>,

    /// Service-bot content store.
    pub content: Arc<ContentRepo>,

    /// Sliding-window action limiter.
    pub actions: ActionTracker,

    /// Required-channel membership gate.
    pub membership: ChannelGate,

    /// Live hosted bot instances.
    pub hosted: Arc<BotRegistry>,

    /// Per-user pending conversational action (awaiting token, etc).
    pub sessions: TypedCache<u64, PendingAction>,
}

impl AppState {
    /// Create a new application state.
    pub fn new(
        db: Arc<Database>,
        cache: Arc<CacheRegistry>,
        hosted: Arc<BotRegistry>,
        config: Config,
    ) -> Self {
        let users = Arc::new(UserRepo::new(&db, &cache));
        let bots = Arc::new(BotRepo::new(&db, &cache));
        let stats = Arc::new(StatsRepo::new(&db));
        let audit = Arc::new(AuditRepo::new(&db));
        let content = Arc::new(ContentRepo::new(&db));

        let actions = ActionTracker::new();
        let membership = ChannelGate::new(&cache);
        let sessions = cache.get_or_create("manager_sessions", CacheConfig::session());

        Self {
            db,
            cache,
            config,
            users,
            bots,
            stats,
            audit,
            content,
            actions,
            membership,
            hosted,
            sessions,
        }
    }

    /// Check if a user is a platform admin.
    pub fn is_admin(&self, user_id: u64) -> bool {
        self.config.is_admin(user_id)
    }

    /// Dependency bundle handed to hosted-bot handlers.
    pub fn hosted_ctx(&self) -> HostedCtx {
        HostedCtx {
            users: self.users.clone(),
            bots: self.bots.clone(),
            stats: self.stats.clone(),
            content: self.content.clone(),
            actions: self.actions.clone(),
            membership: self.membership.clone(),
            config: self.config.clone(),
        }
    }

    /// Post a notice to the platform log channel, best effort.
    pub async fn notify_log_channel(&self, bot: &ThrottledBot, text: String) {
        let channel = match self.config.log_channel.as_deref() {
            Some(c) => c,
            None => return,
        };
        let recipient = guards::channel_recipient(channel);
        if let Err(e) = bot
            .send_message(recipient, text)
            .parse_mode(teloxide::types::ParseMode::Html)
            .await
        {
            debug!("Log channel notify failed: {}", e);
        }
    }
}

/// Build the dispatcher with all handlers.
pub fn build_dispatcher(
    bot: ThrottledBot,
    state: AppState,
) -> Dispatcher<ThrottledBot, anyhow::Error, teloxide::dispatching::DefaultKey> {
    Dispatcher::builder(bot, schema())
        .dependencies(dptree::deps![state])
        .enable_ctrlc_handler()
        .build()
}

/// Build the handler schema.
fn schema() -> UpdateHandler<anyhow::Error> {
    use teloxide::dispatching::UpdateFilterExt;

    // Message handlers: user tracking first, then guards, then commands
    // and session-driven text input (token entry, broadcast text).
    let message_handler = Update::filter_message()
        .inspect_async(track_user)
        .filter_async(guards::allow_message)
        .branch(plugins::command_handler())
        .branch(plugins::session_handler());

    dptree::entry()
        .branch(message_handler)
        .branch(plugins::callback_handler())
}

/// Track user from message (runs before all handlers).
async fn track_user(msg: Message, state: AppState) {
    if let Some(user) = msg.from.as_ref() {
        state.users.clone().upsert_background(user.clone());
    }
}

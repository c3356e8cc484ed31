//! Registry of live hosted bot instances.
//!
//! Bots are loaded lazily: an instance is created on startup reload, on
//! deploy, or on the first webhook hit for a token found in the store.
//! Each instance owns a teloxide `Bot` and, in polling mode, a polling
//! task feeding updates into the hosted-bot handler.

use std::sync::Arc;

use dashmap::DashMap;
use teloxide::prelude::*;
use teloxide::types::Update;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::{BotMode, Config};
use crate::database::HostedBot;
use crate::hosted::{self, HostedCtx};
use crate::utils::is_valid_token_format;

/// Errors surfaced to the deploy/remove flows.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("invalid bot token")]
    InvalidToken,
    #[error("bot is already hosted")]
    AlreadyHosted,
    #[error("bot limit reached ({0})")]
    LimitReached(u32),
    #[error("bot is not hosted")]
    NotFound,
    #[error("{0}")]
    Internal(String),
}

impl From<anyhow::Error> for HostError {
    fn from(e: anyhow::Error) -> Self {
        Self::Internal(e.to_string())
    }
}

/// A live hosted bot.
struct HostedInstance {
    bot: Bot,
    info: HostedBot,
    /// Polling task (polling mode only).
    poll_task: Option<JoinHandle<()>>,
}

impl Drop for HostedInstance {
    fn drop(&mut self) {
        if let Some(task) = self.poll_task.take() {
            task.abort();
        }
    }
}

/// In-memory registry of live hosted bots, keyed by token.
pub struct BotRegistry {
    config: Config,
    instances: DashMap<String, Arc<HostedInstance>>,
}

impl BotRegistry {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            instances: DashMap::new(),
        }
    }

    /// Whether a token currently has a live instance.
    pub fn contains(&self, token: &str) -> bool {
        self.instances.contains_key(token)
    }

    /// Number of live instances.
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// Validate a token by format and against the Bot API.
    ///
    /// Returns the bot's display name and username on success.
    pub async fn validate_token(&self, token: &str) -> Result<(String, String), HostError> {
        if !is_valid_token_format(token) {
            return Err(HostError::InvalidToken);
        }

        let bot = Bot::new(token);
        let me = bot.get_me().await.map_err(|e| {
            debug!("getMe failed for candidate token: {}", e);
            HostError::InvalidToken
        })?;

        Ok((me.first_name.clone(), me.username().to_string()))
    }

    /// Bring a registered bot online.
    ///
    /// In polling mode this spawns a polling task; in webhook mode it
    /// registers the bot's webhook with Telegram.
    pub async fn start(&self, info: HostedBot, ctx: HostedCtx) -> Result<(), HostError> {
        let token = info.token.clone();

        if self.instances.contains_key(&token) {
            return Err(HostError::AlreadyHosted);
        }

        let bot = Bot::new(&token);

        let poll_task = match self.config.bot_mode {
            BotMode::Polling => {
                // A previously configured webhook would block getUpdates.
                let _ = bot.delete_webhook().await;
                Some(spawn_polling(bot.clone(), info.clone(), ctx))
            }
            BotMode::Webhook => {
                let url = self
                    .config
                    .hosted_webhook_url(&token)
                    .and_then(|u| url::Url::parse(&u).ok())
                    .ok_or_else(|| {
                        HostError::Internal("invalid hosted webhook URL".to_string())
                    })?;
                bot.set_webhook(url)
                    .await
                    .map_err(|e| HostError::Internal(e.to_string()))?;
                None
            }
        };

        info!("Hosted bot @{} is online ({:?})", info.username, info.kind);

        self.instances.insert(
            token,
            Arc::new(HostedInstance {
                bot,
                info,
                poll_task,
            }),
        );

        Ok(())
    }

    /// Take a bot offline. Returns true if an instance was stopped.
    pub async fn stop(&self, token: &str) -> bool {
        match self.instances.remove(token) {
            Some((_, instance)) => {
                // Telegram keeps delivering to a registered webhook
                // until it is explicitly deleted.
                let _ = instance.bot.delete_webhook().await;
                info!("Hosted bot @{} is offline", instance.info.username);
                true
            }
            None => false,
        }
    }

    /// Process a webhook update for a hosted bot.
    ///
    /// Lazily loads the instance from the store on first hit. Unknown or
    /// soft-deleted tokens yield `NotFound`.
    pub async fn process_update(
        &self,
        token: &str,
        update: Update,
        ctx: HostedCtx,
    ) -> Result<(), HostError> {
        let instance = match self.instances.get(token) {
            Some(entry) => entry.value().clone(),
            None => {
                // Lazy load: the token may be registered but not live yet
                // (e.g. after a restart in webhook mode).
                let info = ctx
                    .bots
                    .find_by_token(token)
                    .await?
                    .ok_or(HostError::NotFound)?;

                let instance = Arc::new(HostedInstance {
                    bot: Bot::new(token),
                    info,
                    poll_task: None,
                });
                self.instances.insert(token.to_string(), instance.clone());
                debug!("Lazily loaded hosted bot @{}", instance.info.username);
                instance
            }
        };

        hosted::handle_update(&instance.bot, &instance.info, update, &ctx).await?;
        Ok(())
    }

    /// Stop all live instances.
    pub async fn shutdown(&self) {
        let tokens: Vec<String> = self.instances.iter().map(|e| e.key().clone()).collect();
        for token in tokens {
            self.stop(&token).await;
        }
        info!("All hosted bots stopped");
    }
}

/// Long-polling loop for one hosted bot (polling mode).
fn spawn_polling(bot: Bot, info: HostedBot, ctx: HostedCtx) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut offset: i32 = 0;
        info!("Polling started for hosted bot @{}", info.username);

        loop {
            let updates = bot.get_updates().offset(offset).timeout(30).await;

            match updates {
                Ok(updates) => {
                    for update in updates {
                        offset = update.id.0 as i32 + 1;
                        if let Err(e) = hosted::handle_update(&bot, &info, update, &ctx).await {
                            warn!("Hosted bot @{} update error: {}", info.username, e);
                        }
                    }
                }
                Err(e) => {
                    warn!("Polling error for hosted bot @{}: {}", info.username, e);
                    tokio::time::sleep(std::time::Duration::from_secs(5)).await;
                }
            }
        }
    })
}

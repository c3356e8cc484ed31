//! Bot runtime - polling and webhook runners.

use teloxide::prelude::*;
use teloxide::types::BotCommand;
use tracing::{info, warn};

use super::dispatcher::{AppState, ThrottledBot};
use super::webhook;
use crate::config::{BotMode, Config};
use crate::i18n::get_text;

/// Run the bot with the configured mode.
///
/// Automatically selects between polling and webhook based on config.
/// In polling mode a minimal HTTP server still runs for `/health`.
pub async fn run(
    config: &Config,
    mut dispatcher: Dispatcher<ThrottledBot, anyhow::Error, teloxide::dispatching::DefaultKey>,
    bot: ThrottledBot,
    state: AppState,
) {
    match config.bot_mode {
        BotMode::Polling => {
            info!("Starting manager bot in polling mode...");
            // A stale webhook would block getUpdates.
            let _ = bot.delete_webhook().await;
            webhook::spawn_health_server(config.port, state.clone());
            dispatcher.dispatch().await;
        }
        BotMode::Webhook => {
            info!("Starting manager bot in webhook mode...");
            webhook::run_webhook(config, dispatcher, bot, state.clone()).await;
        }
    }

    state.hosted.shutdown().await;
}

/// Register the manager bot's command list with Telegram, for both
/// supported UI languages.
pub async fn set_manager_commands(bot: &ThrottledBot) {
    let commands = [
        "start",
        "addbot",
        "contactbot",
        "mybots",
        "stats",
        "removebot",
        "language",
        "help",
    ];

    let english: Vec<BotCommand> = commands
        .iter()
        .map(|cmd| BotCommand::new(*cmd, get_text("en", &format!("cmd.{}", cmd))))
        .collect();
    if let Err(e) = bot.set_my_commands(english).await {
        warn!("Failed to set bot commands: {}", e);
    }

    let arabic: Vec<BotCommand> = commands
        .iter()
        .map(|cmd| BotCommand::new(*cmd, get_text("ar", &format!("cmd.{}", cmd))))
        .collect();
    if let Err(e) = bot.set_my_commands(arabic).language_code("ar").await {
        warn!("Failed to set Arabic bot commands: {}", e);
    }
}

/// Bring previously registered bots back online in the background.
pub fn spawn_bot_reload(state: AppState) {
    tokio::spawn(async move {
        let bots = match state.bots.list_active().await {
            Ok(bots) => bots,
            Err(e) => {
                warn!("Failed to load hosted bots for reload: {}", e);
                return;
            }
        };

        let total = bots.len();
        let mut online = 0usize;
        for info in bots {
            let username = info.username.clone();
            match state.hosted.start(info, state.hosted_ctx()).await {
                Ok(()) => online += 1,
                Err(e) => warn!("Failed to reload hosted bot @{}: {}", username, e),
            }
        }

        info!("Reloaded {}/{} hosted bots", online, total);
    });
}

//! Plugin system for manager-bot command handlers.
//!
//! Add new plugins by:
//! 1. Creating a new file in this directory
//! 2. Adding `pub mod your_plugin;` below
//! 3. Adding the handler to `command_handler()` / `callback_handler()`

pub mod admin;
pub mod deploy;
pub mod help;
pub mod language;
pub mod mybots;
pub mod removebot;
pub mod session;
pub mod start;
pub mod stats;

pub use session::PendingAction;

use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;

use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::database::BotKind;
use crate::i18n::get_text;

/// All manager bot commands.
#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum Command {
    #[command(description = "Start the bot")]
    Start,

    #[command(description = "Show help")]
    Help,

    #[command(description = "Deploy a new bot")]
    Addbot,

    #[command(description = "Create a contact bot")]
    Contactbot,

    #[command(description = "List your bots")]
    Mybots,

    #[command(description = "Bot statistics")]
    Stats,

    #[command(description = "Remove a bot")]
    Removebot,

    #[command(description = "Switch language")]
    Language,

    #[command(description = "Admin panel")]
    Admin,

    #[command(description = "Cancel the current action")]
    Cancel,
}

/// Build the combined command handler.
pub fn command_handler() -> UpdateHandler<anyhow::Error> {
    use dptree::case;

    teloxide::filter_command::<Command, _>()
        .branch(case![Command::Start].endpoint(start::start_command))
        .branch(case![Command::Help].endpoint(help::help_command))
        .branch(case![Command::Addbot].endpoint(deploy::addbot_command))
        .branch(case![Command::Contactbot].endpoint(deploy::contactbot_command))
        .branch(case![Command::Mybots].endpoint(mybots::mybots_command))
        .branch(case![Command::Stats].endpoint(stats::stats_command))
        .branch(case![Command::Removebot].endpoint(removebot::removebot_command))
        .branch(case![Command::Language].endpoint(language::language_command))
        .branch(case![Command::Admin].endpoint(admin::admin_command))
        .branch(case![Command::Cancel].endpoint(session::cancel_command))
}

/// Build the session-driven text handler (token entry, broadcast text).
///
/// Only fires for users with a pending conversational action; plain text
/// from everyone else falls through unanswered.
pub fn session_handler() -> UpdateHandler<anyhow::Error> {
    dptree::filter(|msg: Message, state: AppState| {
        msg.from
            .as_ref()
            .map(|u| state.sessions.get(&u.id.0).is_some())
            .unwrap_or(false)
    })
    .endpoint(session::handle_pending)
}

/// Build the callback query handler.
pub fn callback_handler() -> UpdateHandler<anyhow::Error> {
    Update::filter_callback_query()
        .branch(prefixed("menu:").endpoint(menu_callback))
        .branch(prefixed("stats:").endpoint(stats::stats_callback))
        .branch(prefixed("rm:").endpoint(removebot::remove_callback))
        .branch(prefixed("lang:").endpoint(language::language_callback))
        .branch(prefixed("admin:").endpoint(admin::admin_callback))
}

fn prefixed(prefix: &'static str) -> UpdateHandler<anyhow::Error> {
    dptree::filter(move |q: CallbackQuery| {
        q.data.as_ref().map(|d| d.starts_with(prefix)).unwrap_or(false)
    })
}

/// Route main-menu button presses to the matching plugin.
async fn menu_callback(bot: ThrottledBot, q: CallbackQuery, state: AppState) -> anyhow::Result<()> {
    bot.answer_callback_query(q.id.clone()).await?;

    let data = q.data.as_deref().unwrap_or_default();
    let chat_id = match q.regular_message() {
        Some(msg) => msg.chat.id,
        None => return Ok(()),
    };
    let user_id = q.from.id.0;

    match data {
        "menu:deploy" => deploy::begin(&bot, chat_id, user_id, BotKind::Service, &state).await,
        "menu:contact" => deploy::begin(&bot, chat_id, user_id, BotKind::Contact, &state).await,
        "menu:list" => mybots::send_list(&bot, chat_id, user_id, &state).await,
        "menu:stats" => stats::send_picker(&bot, chat_id, user_id, &state).await,
        "menu:remove" => removebot::send_picker(&bot, chat_id, user_id, &state).await,
        "menu:lang" => language::send_picker(&bot, chat_id, user_id, &state).await,
        "menu:help" => help::send_help(&bot, chat_id, user_id, &state).await,
        "menu:admin" => admin::send_panel(&bot, chat_id, user_id, &state).await,
        "menu:cancel" => {
            state.sessions.invalidate(&user_id);
            let lang = state.users.get_language(user_id).await;
            bot.send_message(chat_id, get_text(&lang, "msg.cancelled"))
                .await?;
            Ok(())
        }
        _ => Ok(()),
    }
}

//! /help command plugin.

use teloxide::prelude::*;
use teloxide::types::{ChatId, Message, ParseMode};

use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::i18n::get_text;

/// Handle the /help command.
pub async fn help_command(bot: ThrottledBot, msg: Message, state: AppState) -> anyhow::Result<()> {
    let user_id = match msg.from.as_ref() {
        Some(u) => u.id.0,
        None => return Ok(()),
    };
    send_help(&bot, msg.chat.id, user_id, &state).await
}

/// Send the localized help text with the platform limits filled in.
pub async fn send_help(
    bot: &ThrottledBot,
    chat_id: ChatId,
    user_id: u64,
    state: &AppState,
) -> anyhow::Result<()> {
    let lang = state.users.get_language(user_id).await;

    let text = get_text(&lang, "help.manager")
        .replace("{max_bots}", &state.config.max_bots_per_user.to_string())
        .replace("{actions}", &state.config.rate_limit_actions.to_string())
        .replace("{window}", &state.config.rate_limit_window_secs.to_string());

    bot.send_message(chat_id, text)
        .parse_mode(ParseMode::Html)
        .await?;
    Ok(())
}

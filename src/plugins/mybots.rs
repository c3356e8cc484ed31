//! /mybots command plugin: list a user's hosted bots.

use teloxide::prelude::*;
use teloxide::types::{ChatId, Message, ParseMode};

use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::i18n::get_text;

/// Handle the /mybots command.
pub async fn mybots_command(bot: ThrottledBot, msg: Message, state: AppState) -> anyhow::Result<()> {
    let user_id = match msg.from.as_ref() {
        Some(u) => u.id.0,
        None => return Ok(()),
    };
    send_list(&bot, msg.chat.id, user_id, &state).await
}

/// Send the user's bot list.
pub async fn send_list(
    bot: &ThrottledBot,
    chat_id: ChatId,
    user_id: u64,
    state: &AppState,
) -> anyhow::Result<()> {
    let lang = state.users.get_language(user_id).await;
    let bots = state.bots.list_by_owner(user_id).await?;

    if bots.is_empty() {
        bot.send_message(chat_id, get_text(&lang, "msg.no_bots"))
            .await?;
        return Ok(());
    }

    let mut lines = String::new();
    for (index, info) in bots.iter().enumerate() {
        lines.push_str(
            &get_text(&lang, "stats.list_line")
                .replace("{index}", &(index + 1).to_string())
                .replace("{username}", &info.username)
                .replace("{updates}", &info.total_updates.to_string())
                .replace("{messages}", &info.total_messages.to_string()),
        );
        lines.push('\n');
    }

    bot.send_message(chat_id, lines)
        .parse_mode(ParseMode::Html)
        .await?;
    Ok(())
}

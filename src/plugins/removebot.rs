//! Bot removal plugin.
//!
//! Removal is a soft delete: the instance is taken offline and the
//! registration flagged inactive, preserving its statistics.

use teloxide::prelude::*;
use teloxide::types::{ChatId, Message};
use tracing::info;

use super::stats::picker_keyboard;
use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::i18n::get_text;

/// Handle the /removebot command.
pub async fn removebot_command(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
) -> anyhow::Result<()> {
    let user_id = match msg.from.as_ref() {
        Some(u) => u.id.0,
        None => return Ok(()),
    };
    send_picker(&bot, msg.chat.id, user_id, &state).await
}

/// Send an inline picker over the user's bots.
pub async fn send_picker(
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

    bot.send_message(chat_id, get_text(&lang, "msg.select_bot"))
        .reply_markup(picker_keyboard(&bots, "rm"))
        .await?;
    Ok(())
}

/// Handle a `rm:<username>` selection.
pub async fn remove_callback(
    bot: ThrottledBot,
    q: CallbackQuery,
    state: AppState,
) -> anyhow::Result<()> {
    bot.answer_callback_query(q.id.clone()).await?;

    let username = match q.data.as_deref().and_then(|d| d.strip_prefix("rm:")) {
        Some(u) => u.to_string(),
        None => return Ok(()),
    };
    let msg = match q.regular_message() {
        Some(m) => m,
        None => return Ok(()),
    };

    let user_id = q.from.id.0;
    let lang = state.users.get_language(user_id).await;

    // Ownership check: the callback data is attacker-controllable.
    let info = match state.bots.find_owned_by_username(user_id, &username).await? {
        Some(info) => info,
        None => {
            bot.edit_message_text(msg.chat.id, msg.id, get_text(&lang, "msg.no_bots"))
                .await?;
            return Ok(());
        }
    };

    state.hosted.stop(&info.token).await;
    state.bots.deactivate(&info.token).await?;
    info!("User {} removed @{}", user_id, info.username);

    bot.edit_message_text(msg.chat.id, msg.id, get_text(&lang, "msg.bot_removed"))
        .await?;

    state
        .audit
        .clone()
        .record_background(user_id, "remove", Some(format!("@{}", info.username)));
    state
        .notify_log_channel(
            &bot,
            format!(
                "🗑 Bot removed: @{} by <code>{}</code>",
                info.username, user_id
            ),
        )
        .await;

    Ok(())
}

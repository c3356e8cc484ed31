//! Admin panel plugin.
//!
//! Platform-wide statistics and broadcast, restricted to the IDs in
//! `ADMIN_IDS`.

use std::time::Duration;

use teloxide::prelude::*;
use teloxide::types::{
    ChatId, InlineKeyboardButton, InlineKeyboardMarkup, Message, ParseMode,
};
use tracing::{debug, info};

use super::session::PendingAction;
use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::i18n::get_text;
use crate::utils::html_escape;

/// Delay between broadcast sends, to stay friendly with the API.
const BROADCAST_PACE: Duration = Duration::from_millis(50);

/// Handle the /admin command.
pub async fn admin_command(bot: ThrottledBot, msg: Message, state: AppState) -> anyhow::Result<()> {
    let user_id = match msg.from.as_ref() {
        Some(u) => u.id.0,
        None => return Ok(()),
    };
    send_panel(&bot, msg.chat.id, user_id, &state).await
}

/// Send the admin panel (stats + actions).
pub async fn send_panel(
    bot: &ThrottledBot,
    chat_id: ChatId,
    user_id: u64,
    state: &AppState,
) -> anyhow::Result<()> {
    let lang = state.users.get_language(user_id).await;

    if !state.is_admin(user_id) {
        bot.send_message(chat_id, get_text(&lang, "msg.unauthorized"))
            .await?;
        return Ok(());
    }

    bot.send_message(chat_id, panel_text(state, &lang).await?)
        .parse_mode(ParseMode::Html)
        .reply_markup(panel_keyboard(&lang))
        .await?;
    Ok(())
}

/// Handle `admin:*` panel buttons.
pub async fn admin_callback(
    bot: ThrottledBot,
    q: CallbackQuery,
    state: AppState,
) -> anyhow::Result<()> {
    bot.answer_callback_query(q.id.clone()).await?;

    let user_id = q.from.id.0;
    if !state.is_admin(user_id) {
        return Ok(());
    }

    let msg = match q.regular_message() {
        Some(m) => m,
        None => return Ok(()),
    };
    let lang = state.users.get_language(user_id).await;

    match q.data.as_deref() {
        Some("admin:refresh") => {
            bot.edit_message_text(msg.chat.id, msg.id, panel_text(&state, &lang).await?)
                .parse_mode(ParseMode::Html)
                .reply_markup(panel_keyboard(&lang))
                .await?;
        }
        Some("admin:broadcast") => {
            state
                .sessions
                .insert(user_id, PendingAction::AwaitingBroadcast);
            bot.send_message(msg.chat.id, get_text(&lang, "admin.enter_broadcast"))
                .reply_markup(super::deploy::cancel_keyboard(&lang))
                .await?;
        }
        _ => {}
    }
    Ok(())
}

/// Copy an admin's message to every active user.
///
/// Users who blocked the manager bot are marked inactive so the next
/// broadcast skips them.
pub async fn handle_broadcast_input(
    bot: &ThrottledBot,
    msg: &Message,
    state: &AppState,
) -> anyhow::Result<()> {
    let user_id = match msg.from.as_ref() {
        Some(u) => u.id.0,
        None => return Ok(()),
    };
    let lang = state.users.get_language(user_id).await;

    if !state.is_admin(user_id) {
        bot.send_message(msg.chat.id, get_text(&lang, "msg.unauthorized"))
            .await?;
        return Ok(());
    }

    let targets = state.users.active_ids().await?;
    let mut delivered = 0usize;

    for target in targets {
        if target == user_id {
            continue;
        }
        match bot
            .copy_message(ChatId(target as i64), msg.chat.id, msg.id)
            .await
        {
            Ok(_) => delivered += 1,
            Err(e) => {
                debug!("Broadcast to {} failed: {}", target, e);
                let _ = state.users.deactivate(target).await;
            }
        }
        tokio::time::sleep(BROADCAST_PACE).await;
    }

    info!("Broadcast by {} delivered to {} users", user_id, delivered);

    let report =
        get_text(&lang, "admin.broadcast_sent").replace("{count}", &delivered.to_string());
    bot.send_message(msg.chat.id, report).await?;

    state
        .audit
        .clone()
        .record_background(
            user_id,
            "broadcast",
            Some(format!("{} recipients", delivered)),
        );
    Ok(())
}

/// Render the panel body from live aggregates.
async fn panel_text(state: &AppState, lang: &str) -> anyhow::Result<String> {
    let total_users = state.users.count().await?;
    let stats = state.bots.global_stats(total_users).await?;

    let mut lines = vec![
        get_text(lang, "admin.panel"),
        String::new(),
        get_text(lang, "admin.total_users").replace("{count}", &stats.total_users.to_string()),
        get_text(lang, "admin.total_bots").replace("{count}", &stats.total_bots.to_string()),
        get_text(lang, "admin.total_updates").replace("{count}", &stats.total_updates.to_string()),
        get_text(lang, "admin.total_messages")
            .replace("{count}", &stats.total_messages.to_string()),
    ];

    if let Some(top) = &stats.top_bot {
        lines.push(
            get_text(lang, "admin.top_bot")
                .replace("{name}", &html_escape(&top.name))
                .replace("{updates}", &top.total_updates.to_string()),
        );
    }

    Ok(lines.join("\n"))
}

fn panel_keyboard(lang: &str) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![
        InlineKeyboardButton::callback(get_text(lang, "admin.broadcast"), "admin:broadcast"),
        InlineKeyboardButton::callback(get_text(lang, "admin.refresh"), "admin:refresh"),
    ]])
}

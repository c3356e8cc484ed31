//! Per-bot statistics plugin.
//!
//! `/stats` shows a bot picker; selecting one renders its lifetime
//! statistics card.

use teloxide::prelude::*;
use teloxide::types::{
    ChatId, InlineKeyboardButton, InlineKeyboardMarkup, Message, ParseMode,
};

use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::database::HostedBot;
use crate::i18n::get_text;
use crate::utils::html_escape;

/// Handle the /stats command.
pub async fn stats_command(bot: ThrottledBot, msg: Message, state: AppState) -> anyhow::Result<()> {
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
        .reply_markup(picker_keyboard(&bots, "stats"))
        .await?;
    Ok(())
}

/// Handle a `stats:<username>` selection.
pub async fn stats_callback(
    bot: ThrottledBot,
    q: CallbackQuery,
    state: AppState,
) -> anyhow::Result<()> {
    bot.answer_callback_query(q.id.clone()).await?;

    let username = match q.data.as_deref().and_then(|d| d.strip_prefix("stats:")) {
        Some(u) => u.to_string(),
        None => return Ok(()),
    };
    let msg = match q.regular_message() {
        Some(m) => m,
        None => return Ok(()),
    };

    let user_id = q.from.id.0;
    let lang = state.users.get_language(user_id).await;

    // Look up by owner so users cannot probe other people's bots.
    let info = match state.bots.find_owned_by_username(user_id, &username).await? {
        Some(info) => info,
        None => {
            bot.edit_message_text(msg.chat.id, msg.id, get_text(&lang, "msg.no_bots"))
                .await?;
            return Ok(());
        }
    };

    let status_key = if info.is_active {
        "stats.active"
    } else {
        "stats.inactive"
    };
    let card = get_text(&lang, "stats.card")
        .replace("{name}", &html_escape(&info.name))
        .replace("{username}", &info.username)
        .replace("{updates}", &info.total_updates.to_string())
        .replace("{messages}", &info.total_messages.to_string())
        .replace("{created}", &info.created_date())
        .replace("{status}", &get_text(&lang, status_key));

    let back = InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::callback(
        get_text(&lang, "btn.back"),
        "menu:stats",
    )]]);

    bot.edit_message_text(msg.chat.id, msg.id, card)
        .parse_mode(ParseMode::Html)
        .reply_markup(back)
        .await?;
    Ok(())
}

/// One button per bot, callback data `<prefix>:<username>`.
pub fn picker_keyboard(bots: &[HostedBot], prefix: &str) -> InlineKeyboardMarkup {
    let rows = bots
        .iter()
        .map(|info| {
            vec![InlineKeyboardButton::callback(
                format!("🤖 @{}", info.username),
                format!("{}:{}", prefix, info.username),
            )]
        })
        .collect::<Vec<_>>();
    InlineKeyboardMarkup::new(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::BotKind;

    #[test]
    fn test_picker_keyboard_data() {
        let bots = vec![
            HostedBot::new(1, "1:a", "A", "a_bot", BotKind::Service),
            HostedBot::new(1, "2:b", "B", "b_bot", BotKind::Contact),
        ];
        let keyboard = picker_keyboard(&bots, "rm");
        assert_eq!(keyboard.inline_keyboard.len(), 2);
        match &keyboard.inline_keyboard[0][0].kind {
            teloxide::types::InlineKeyboardButtonKind::CallbackData(data) => {
                assert_eq!(data, "rm:a_bot");
            }
            other => panic!("unexpected button kind: {:?}", other),
        }
    }
}

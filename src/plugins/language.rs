//! Language switcher plugin (English / Arabic).

use teloxide::prelude::*;
use teloxide::types::{ChatId, InlineKeyboardButton, InlineKeyboardMarkup, Message};

use super::start::main_menu;
use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::i18n::{self, get_text};

/// Handle the /language command.
pub async fn language_command(
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

/// Send the language picker.
pub async fn send_picker(
    bot: &ThrottledBot,
    chat_id: ChatId,
    user_id: u64,
    state: &AppState,
) -> anyhow::Result<()> {
    let lang = state.users.get_language(user_id).await;

    let keyboard = InlineKeyboardMarkup::new(vec![vec![
        InlineKeyboardButton::callback(get_text(&lang, "btn.english"), "lang:en".to_string()),
        InlineKeyboardButton::callback(get_text(&lang, "btn.arabic"), "lang:ar".to_string()),
    ]]);

    bot.send_message(chat_id, get_text(&lang, "msg.choose_language"))
        .reply_markup(keyboard)
        .await?;
    Ok(())
}

/// Handle a `lang:<code>` selection.
pub async fn language_callback(
    bot: ThrottledBot,
    q: CallbackQuery,
    state: AppState,
) -> anyhow::Result<()> {
    bot.answer_callback_query(q.id.clone()).await?;

    let picked = match q.data.as_deref().and_then(|d| d.strip_prefix("lang:")) {
        Some(code) if i18n::is_supported(code) => code.to_string(),
        _ => return Ok(()),
    };
    let msg = match q.regular_message() {
        Some(m) => m,
        None => return Ok(()),
    };

    let user_id = q.from.id.0;
    state.users.set_language(user_id, &picked).await?;

    // Re-render the confirmation and the menu in the new language.
    bot.edit_message_text(
        msg.chat.id,
        msg.id,
        get_text(&picked, "msg.language_changed"),
    )
    .reply_markup(main_menu(&picked, state.is_admin(user_id)))
    .await?;
    Ok(())
}

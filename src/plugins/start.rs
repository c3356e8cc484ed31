//! /start command plugin.
//!
//! Greets the user and shows the main inline menu. Returning users get a
//! personal greeting, first-timers the generic welcome.

use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, Message};

use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::i18n::get_text;
use crate::utils::html_escape;

/// Handle the /start command.
pub async fn start_command(bot: ThrottledBot, msg: Message, state: AppState) -> anyhow::Result<()> {
    let user = match msg.from.as_ref() {
        Some(u) => u,
        None => return Ok(()),
    };
    let user_id = user.id.0;
    let lang = state.users.get_language(user_id).await;

    // Known users get a personal greeting; the tracker has already
    // upserted this user, so "known" means seen before this message.
    let greeting = match state.users.get_by_id(user_id).await? {
        Some(existing) if existing.created_at < chrono::Utc::now().timestamp() - 60 => {
            let name = html_escape(&user.first_name);
            format!(
                "{}\n\n{}",
                get_text(&lang, "msg.welcome_back").replace("{name}", &name),
                get_text(&lang, "msg.welcome")
            )
        }
        _ => get_text(&lang, "msg.welcome"),
    };

    bot.send_message(msg.chat.id, greeting)
        .parse_mode(teloxide::types::ParseMode::Html)
        .reply_markup(main_menu(&lang, state.is_admin(user_id)))
        .await?;

    state.audit.clone().record_background(user_id, "start", None);
    Ok(())
}

/// Build the main inline menu.
pub fn main_menu(lang: &str, is_admin: bool) -> InlineKeyboardMarkup {
    let btn = |key: &str, data: &str| {
        InlineKeyboardButton::callback(get_text(lang, key), data.to_string())
    };

    let mut rows = vec![
        vec![
            btn("menu.deploy_bot", "menu:deploy"),
            btn("menu.contact_bot", "menu:contact"),
        ],
        vec![
            btn("menu.my_bots", "menu:list"),
            btn("menu.stats", "menu:stats"),
        ],
        vec![
            btn("menu.remove_bot", "menu:remove"),
            btn("menu.language", "menu:lang"),
        ],
        vec![btn("menu.help", "menu:help")],
    ];

    if is_admin {
        rows.push(vec![btn("menu.admin_panel", "menu:admin")]);
    }

    InlineKeyboardMarkup::new(rows)
}

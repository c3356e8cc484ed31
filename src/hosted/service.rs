//! Service bot template: Quran verses and video links.
//!
//! A reply-keyboard driven bot serving random entries from the shared
//! content store.

use teloxide::prelude::*;
use teloxide::types::{KeyboardButton, KeyboardMarkup, Message};

use super::HostedCtx;
use crate::database::ContentKind;
use crate::i18n::{self, get_text};

pub async fn handle_message(bot: &Bot, msg: &Message, ctx: &HostedCtx) -> anyhow::Result<()> {
    let user = match msg.from.as_ref() {
        Some(u) => u,
        None => return Ok(()),
    };

    // Hosted service bots feed the same user base as the manager.
    ctx.users.clone().upsert_background(user.clone());

    let lang = ctx.users.get_language(user.id.0).await;
    let text = match msg.text() {
        Some(t) => t,
        None => return Ok(()),
    };

    if text == "/start" {
        bot.send_message(msg.chat.id, get_text(&lang, "service.welcome"))
            .reply_markup(main_keyboard(&lang))
            .await?;
        return Ok(());
    }

    if matches_key(text, "service.quran") {
        return send_content(bot, msg, ctx, &lang, ContentKind::Quran, "📖").await;
    }
    if matches_key(text, "service.videos") {
        return send_content(bot, msg, ctx, &lang, ContentKind::Video, "🎥").await;
    }
    if text == "/help" || matches_key(text, "menu.help") {
        bot.send_message(msg.chat.id, get_text(&lang, "service.help"))
            .await?;
        return Ok(());
    }
    if text == "/language" || matches_key(text, "menu.language") {
        bot.send_message(msg.chat.id, get_text(&lang, "msg.choose_language"))
            .reply_markup(language_keyboard())
            .await?;
        return Ok(());
    }
    if matches_key(text, "btn.english") || matches_key(text, "btn.arabic") {
        let picked = if matches_key(text, "btn.english") {
            "en"
        } else {
            "ar"
        };
        ctx.users.set_language(user.id.0, picked).await?;
        bot.send_message(msg.chat.id, get_text(picked, "msg.language_changed"))
            .reply_markup(main_keyboard(picked))
            .await?;
        return Ok(());
    }

    // Anything else re-shows the menu.
    bot.send_message(msg.chat.id, get_text(&lang, "service.welcome"))
        .reply_markup(main_keyboard(&lang))
        .await?;
    Ok(())
}

async fn send_content(
    bot: &Bot,
    msg: &Message,
    ctx: &HostedCtx,
    lang: &str,
    kind: ContentKind,
    prefix: &str,
) -> anyhow::Result<()> {
    let reply = match ctx.content.random(kind).await? {
        Some(item) => format!("{} {}", prefix, item.content),
        None => get_text(lang, "service.no_content"),
    };
    bot.send_message(msg.chat.id, reply).await?;
    Ok(())
}

/// Match a button press against a translation key in any supported
/// language. Reply-keyboard presses arrive as plain text, and a user may
/// switch languages while an old keyboard is still on screen.
fn matches_key(text: &str, key: &str) -> bool {
    i18n::SUPPORTED
        .iter()
        .any(|lang| get_text(lang, key) == text)
}

fn main_keyboard(lang: &str) -> KeyboardMarkup {
    KeyboardMarkup::new(vec![
        vec![
            KeyboardButton::new(get_text(lang, "service.quran")),
            KeyboardButton::new(get_text(lang, "service.videos")),
        ],
        vec![
            KeyboardButton::new(get_text(lang, "menu.help")),
            KeyboardButton::new(get_text(lang, "menu.language")),
        ],
    ])
    .resize_keyboard()
}

fn language_keyboard() -> KeyboardMarkup {
    KeyboardMarkup::new(vec![vec![
        KeyboardButton::new(get_text("en", "btn.english")),
        KeyboardButton::new(get_text("en", "btn.arabic")),
    ]])
    .resize_keyboard()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_matches_either_language() {
        crate::i18n::init();
        assert!(matches_key("📖 Quran Verses", "service.quran"));
        assert!(matches_key("📖 آيات قرآنية", "service.quran"));
        assert!(!matches_key("random text", "service.quran"));
    }
}

//! Bot deployment flow.
//!
//! `/addbot` and `/contactbot` (or the matching menu buttons) put the
//! user into a token-entry session; the token is validated against the
//! Bot API, registered in the store and brought online.

use teloxide::prelude::*;
use teloxide::types::{
    ChatId, InlineKeyboardButton, InlineKeyboardMarkup, Message, ParseMode,
};
use tracing::info;

use super::session::PendingAction;
use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::database::{BotKind, HostedBot};
use crate::i18n::get_text;
use crate::registry::HostError;
use crate::utils::{html_escape, mask_token};

/// Handle the /addbot command (service bot).
pub async fn addbot_command(bot: ThrottledBot, msg: Message, state: AppState) -> anyhow::Result<()> {
    command_entry(bot, msg, BotKind::Service, state).await
}

/// Handle the /contactbot command.
pub async fn contactbot_command(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
) -> anyhow::Result<()> {
    command_entry(bot, msg, BotKind::Contact, state).await
}

async fn command_entry(
    bot: ThrottledBot,
    msg: Message,
    kind: BotKind,
    state: AppState,
) -> anyhow::Result<()> {
    let user_id = match msg.from.as_ref() {
        Some(u) => u.id.0,
        None => return Ok(()),
    };
    begin(&bot, msg.chat.id, user_id, kind, &state).await
}

/// Start a deploy flow: remember what we are waiting for and prompt.
pub async fn begin(
    bot: &ThrottledBot,
    chat_id: ChatId,
    user_id: u64,
    kind: BotKind,
    state: &AppState,
) -> anyhow::Result<()> {
    let lang = state.users.get_language(user_id).await;

    // Enforce the cap up front so the user does not fetch a token for
    // nothing; it is re-checked at registration time.
    let count = state.bots.count_active_for(user_id).await?;
    if count >= state.config.max_bots_per_user as u64 {
        let notice = get_text(&lang, "msg.max_bots_reached")
            .replace("{limit}", &state.config.max_bots_per_user.to_string());
        bot.send_message(chat_id, notice).await?;
        return Ok(());
    }

    state
        .sessions
        .insert(user_id, PendingAction::AwaitingToken { kind });
    bot.send_message(chat_id, get_text(&lang, "msg.enter_token"))
        .reply_markup(cancel_keyboard(&lang))
        .await?;
    Ok(())
}

/// Single inline cancel button clearing the pending session.
pub fn cancel_keyboard(lang: &str) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::callback(
        get_text(lang, "btn.cancel"),
        "menu:cancel",
    )]])
}

/// Handle the token a user sent during a deploy flow.
pub async fn handle_token_input(
    bot: &ThrottledBot,
    msg: &Message,
    kind: BotKind,
    state: &AppState,
) -> anyhow::Result<()> {
    let user = match msg.from.as_ref() {
        Some(u) => u,
        None => return Ok(()),
    };
    let user_id = user.id.0;
    let lang = state.users.get_language(user_id).await;

    let token = match msg.text() {
        Some(t) => t.trim().to_string(),
        None => {
            bot.send_message(msg.chat.id, get_text(&lang, "msg.invalid_token"))
                .await?;
            return Ok(());
        }
    };

    let progress = bot
        .send_message(msg.chat.id, get_text(&lang, "msg.processing"))
        .await?;
    let report = |text: String| bot.edit_message_text(msg.chat.id, progress.id, text);

    let (name, username) = match state.hosted.validate_token(&token).await {
        Ok(me) => me,
        Err(_) => {
            report(get_text(&lang, "msg.invalid_token")).await?;
            return Ok(());
        }
    };

    match register(state, user_id, &token, &name, &username, kind).await {
        Ok(()) => {}
        Err(HostError::AlreadyHosted) => {
            report(get_text(&lang, "msg.bot_already_exists")).await?;
            return Ok(());
        }
        Err(HostError::LimitReached(limit)) => {
            let notice =
                get_text(&lang, "msg.max_bots_reached").replace("{limit}", &limit.to_string());
            report(notice).await?;
            return Ok(());
        }
        Err(e) => {
            info!("Deploy failed for {}: {}", mask_token(&token), e);
            report(get_text(&lang, "msg.error")).await?;
            return Ok(());
        }
    }

    info!("User {} deployed @{} ({:?})", user_id, username, kind);

    let done = get_text(&lang, "msg.bot_added")
        .replace("{name}", &html_escape(&name))
        .replace("{username}", &username);
    report(done).parse_mode(ParseMode::Html).await?;

    state.audit.clone().record_background(
        user_id,
        "deploy",
        Some(format!("@{} ({:?})", username, kind)),
    );
    state
        .notify_log_channel(
            bot,
            format!(
                "🚀 New bot deployed: @{} ({:?}) by <code>{}</code>",
                username, kind, user_id
            ),
        )
        .await;

    Ok(())
}

/// How a validated token enters the store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Registration {
    /// Fresh token, insert a new document.
    Insert,
    /// Token was soft-deleted, revive the existing document.
    Reactivate,
}

/// Decide how a validated token gets registered.
///
/// A token that is live in the registry or active in the store is a
/// duplicate. The per-user cap counts active bots only, so removing a
/// bot frees its slot.
fn classify(
    already_live: bool,
    active_exists: bool,
    inactive_exists: bool,
    active_count: u64,
    cap: u32,
) -> Result<Registration, HostError> {
    if already_live || active_exists {
        return Err(HostError::AlreadyHosted);
    }
    if active_count >= cap as u64 {
        return Err(HostError::LimitReached(cap));
    }
    Ok(if inactive_exists {
        Registration::Reactivate
    } else {
        Registration::Insert
    })
}

/// Register a validated token in the store and bring it online.
async fn register(
    state: &AppState,
    owner_id: u64,
    token: &str,
    name: &str,
    username: &str,
    kind: BotKind,
) -> Result<(), HostError> {
    let decision = classify(
        state.hosted.contains(token),
        state.bots.find_by_token(token).await?.is_some(),
        state.bots.find_inactive(token).await?.is_some(),
        state.bots.count_active_for(owner_id).await?,
        state.config.max_bots_per_user,
    )?;

    let info = HostedBot::new(owner_id, token, name, username, kind);
    match decision {
        // Revived in place so the bot keeps its statistics.
        Registration::Reactivate => state.bots.reactivate(&info).await?,
        Registration::Insert => state.bots.insert(&info).await?,
    }

    let info = state
        .bots
        .find_by_token(token)
        .await?
        .ok_or(HostError::NotFound)?;
    state.hosted.start(info, state.hosted_ctx()).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_token_inserts() {
        assert_eq!(
            classify(false, false, false, 0, 3).unwrap(),
            Registration::Insert
        );
    }

    #[test]
    fn test_duplicate_token_rejected() {
        assert!(matches!(
            classify(false, true, false, 0, 3),
            Err(HostError::AlreadyHosted)
        ));
        // Live in the registry but not yet visible in the store
        // (e.g. a racing deploy) still counts as a duplicate.
        assert!(matches!(
            classify(true, false, false, 0, 3),
            Err(HostError::AlreadyHosted)
        ));
    }

    #[test]
    fn test_cap_enforced() {
        assert!(matches!(
            classify(false, false, false, 3, 3),
            Err(HostError::LimitReached(3))
        ));
        assert_eq!(
            classify(false, false, false, 2, 3).unwrap(),
            Registration::Insert
        );
    }

    #[test]
    fn test_soft_deleted_token_reactivates() {
        assert_eq!(
            classify(false, false, true, 0, 3).unwrap(),
            Registration::Reactivate
        );
    }

    #[test]
    fn test_duplicate_reported_before_cap() {
        assert!(matches!(
            classify(false, true, false, 5, 3),
            Err(HostError::AlreadyHosted)
        ));
    }
}

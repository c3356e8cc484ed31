//! Per-user conversational state.
//!
//! The manager bot has two multi-step flows: deploying a bot (awaiting a
//! token) and broadcasting (awaiting the message). Pending actions live
//! in a TTL cache, so an abandoned flow simply expires.

use teloxide::prelude::*;
use teloxide::types::Message;

use super::{admin, deploy};
use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::database::BotKind;
use crate::i18n::get_text;

/// What the manager bot is waiting for from a user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PendingAction {
    /// A bot token for a deploy flow.
    AwaitingToken { kind: BotKind },
    /// A broadcast message from an admin.
    AwaitingBroadcast,
}

/// Handle text from a user with a pending action.
pub async fn handle_pending(bot: ThrottledBot, msg: Message, state: AppState) -> anyhow::Result<()> {
    let user_id = match msg.from.as_ref() {
        Some(u) => u.id.0,
        None => return Ok(()),
    };

    let pending = match state.sessions.get(&user_id) {
        Some(p) => p,
        None => return Ok(()),
    };
    state.sessions.invalidate(&user_id);

    match pending {
        PendingAction::AwaitingToken { kind } => {
            deploy::handle_token_input(&bot, &msg, kind, &state).await
        }
        PendingAction::AwaitingBroadcast => admin::handle_broadcast_input(&bot, &msg, &state).await,
    }
}

/// Handle the /cancel command.
pub async fn cancel_command(bot: ThrottledBot, msg: Message, state: AppState) -> anyhow::Result<()> {
    let user_id = match msg.from.as_ref() {
        Some(u) => u.id.0,
        None => return Ok(()),
    };

    state.sessions.invalidate(&user_id);
    let lang = state.users.get_language(user_id).await;
    bot.send_message(msg.chat.id, get_text(&lang, "msg.cancelled"))
        .await?;
    Ok(())
}

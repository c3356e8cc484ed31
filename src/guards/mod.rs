//! Guards applied before handlers run.
//!
//! Two gates protect both the manager bot and hosted bots:
//! - a sliding-window rate limiter on user actions
//! - a required-channel membership check

mod membership;
mod ratelimit;

pub use membership::{channel_recipient, ChannelGate};
pub use ratelimit::{ActionTracker, Verdict};

use teloxide::prelude::*;
use teloxide::types::Message;
use tracing::debug;

use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::i18n::get_text;

/// Combined per-message gate for the manager bot.
///
/// Returns true if the message may proceed to handlers. When blocking,
/// sends a single localized notice. Admins bypass both gates; API
/// failures on the membership check fail open.
pub async fn allow_message(bot: ThrottledBot, msg: Message, state: AppState) -> bool {
    let user = match msg.from.as_ref() {
        Some(u) => u,
        None => return false,
    };

    if user.is_bot {
        return false;
    }

    let user_id = user.id.0;

    if state.is_admin(user_id) {
        return true;
    }

    // Rate limit first: it is purely in-memory.
    match state.actions.record(
        user_id,
        state.config.rate_limit_actions,
        state.config.rate_limit_window_secs,
    ) {
        Verdict::Allowed => {}
        Verdict::Limited { first } => {
            debug!("Rate limit hit for user {}", user_id);
            if first {
                let lang = state.users.get_language(user_id).await;
                let _ = bot
                    .send_message(msg.chat.id, get_text(&lang, "msg.rate_limited"))
                    .await;
            }
            return false;
        }
    }

    // Channel membership gate.
    let channel = match state.config.required_channel.as_deref() {
        Some(c) => c,
        None => return true,
    };

    match state.membership.is_member(bot.inner(), channel, user.id).await {
        Ok(true) => true,
        Ok(false) => {
            let lang = state.users.get_language(user_id).await;
            let notice =
                get_text(&lang, "msg.must_join_channel").replace("{channel}", channel);
            let _ = bot.send_message(msg.chat.id, notice).await;
            false
        }
        Err(e) => {
            // Fail open: a broken membership check should not lock
            // everyone out of the platform.
            debug!("Channel check failed for user {}: {}", user_id, e);
            true
        }
    }
}

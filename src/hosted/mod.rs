//! Built-in behaviors for hosted bots.
//!
//! Every hosted token is bound to a behavior template (`BotKind`) at
//! deploy time and runs fully in-process. Updates arrive here from the
//! per-bot polling loop or from the hosted webhook route.

mod contact;
mod service;

use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::types::{Update, UpdateKind};
use tracing::{debug, warn};

use crate::config::Config;
use crate::database::{BotKind, BotRepo, ContentRepo, HostedBot, StatsRepo, UserRepo};
use crate::guards::{ActionTracker, ChannelGate, Verdict};
use crate::i18n::get_text;

/// Shared dependencies for hosted-bot handlers.
///
/// Hosted bots share the platform's user base, guards and content store;
/// this bundle is what the registry threads through to the handlers.
#[derive(Clone)]
pub struct HostedCtx {
    pub users: Arc<UserRepo>,
    pub bots: Arc<BotRepo>,
    pub stats: Arc<StatsRepo>,
    pub content: Arc<ContentRepo>,
    pub actions: ActionTracker,
    pub membership: ChannelGate,
    pub config: Config,
}

/// Entry point for one hosted-bot update.
///
/// Bumps statistics, applies guards, then dispatches to the behavior
/// template.
pub async fn handle_update(
    bot: &Bot,
    info: &HostedBot,
    update: Update,
    ctx: &HostedCtx,
) -> anyhow::Result<()> {
    let msg = match update.kind {
        UpdateKind::Message(msg) => msg,
        _ => {
            // Non-message updates still count towards update totals.
            record_stats(info, false, ctx);
            return Ok(());
        }
    };

    record_stats(info, true, ctx);

    let user = match msg.from.as_ref() {
        Some(u) => u,
        None => return Ok(()),
    };
    if user.is_bot {
        return Ok(());
    }

    let user_id = user.id.0;
    let is_privileged = ctx.config.is_admin(user_id) || user_id == info.owner_id;

    // Rate limit (admins and the bot's owner bypass)
    if !is_privileged {
        if let Verdict::Limited { first } = ctx.actions.record(
            user_id,
            ctx.config.rate_limit_actions,
            ctx.config.rate_limit_window_secs,
        ) {
            debug!("Rate limit hit for user {} on @{}", user_id, info.username);
            if first {
                let lang = ctx.users.get_language(user_id).await;
                let _ = bot
                    .send_message(msg.chat.id, get_text(&lang, "msg.rate_limited"))
                    .await;
            }
            return Ok(());
        }
    }

    // Channel gate applies to service bots only; contact bots must stay
    // reachable so users can always reach the owner.
    if info.kind == BotKind::Service && !is_privileged {
        if let Some(channel) = ctx.config.required_channel.as_deref() {
            match ctx.membership.is_member(bot, channel, user.id).await {
                Ok(false) => {
                    let lang = ctx.users.get_language(user_id).await;
                    let notice = get_text(&lang, "msg.must_join_channel")
                        .replace("{channel}", channel);
                    bot.send_message(msg.chat.id, notice).await?;
                    return Ok(());
                }
                Ok(true) => {}
                Err(e) => {
                    // Fail open, same as the manager gate.
                    debug!("Channel check failed on @{}: {}", info.username, e);
                }
            }
        }
    }

    match info.kind {
        BotKind::Service => service::handle_message(bot, &msg, ctx).await,
        BotKind::Contact => contact::handle_message(bot, &msg, info, ctx).await,
    }
}

/// Record update/message counters in the background.
fn record_stats(info: &HostedBot, is_message: bool, ctx: &HostedCtx) {
    let token = info.token.clone();
    let username = info.username.clone();
    let bots = ctx.bots.clone();
    let stats = ctx.stats.clone();

    tokio::spawn(async move {
        if let Err(e) = bots.increment_totals(&token, is_message).await {
            warn!("Failed to bump totals for @{}: {}", username, e);
        }
        if let Err(e) = stats.bump(&token, is_message).await {
            warn!("Failed to bump daily stats for @{}: {}", username, e);
        }
    });
}

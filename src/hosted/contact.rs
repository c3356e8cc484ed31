//! Contact bot template: a relay between the bot's owner and its users.
//!
//! User messages are forwarded to the owner; the owner answers by
//! replying to a forwarded message, and the reply is copied back to the
//! original sender.

use teloxide::prelude::*;
use teloxide::types::{ChatId, Message, MessageOrigin};
use tracing::debug;

use super::HostedCtx;
use crate::database::HostedBot;
use crate::i18n::get_text;

pub async fn handle_message(
    bot: &Bot,
    msg: &Message,
    info: &HostedBot,
    ctx: &HostedCtx,
) -> anyhow::Result<()> {
    let user = match msg.from.as_ref() {
        Some(u) => u,
        None => return Ok(()),
    };

    ctx.users.clone().upsert_background(user.clone());

    let lang = ctx.users.get_language(user.id.0).await;

    if msg.text() == Some("/start") {
        bot.send_message(msg.chat.id, get_text(&lang, "contact.welcome"))
            .await?;
        return Ok(());
    }

    if user.id.0 == info.owner_id {
        owner_reply(bot, msg, &lang).await
    } else {
        relay_to_owner(bot, msg, info, ctx, &lang).await
    }
}

/// Owner side: copy a reply back to the user the replied-to message was
/// forwarded from.
async fn owner_reply(bot: &Bot, msg: &Message, lang: &str) -> anyhow::Result<()> {
    let replied = match msg.reply_to_message() {
        Some(r) => r,
        None => {
            bot.send_message(msg.chat.id, get_text(lang, "contact.reply_hint"))
                .await?;
            return Ok(());
        }
    };

    let target = match replied.forward_origin() {
        Some(MessageOrigin::User { sender_user, .. }) => ChatId(sender_user.id.0 as i64),
        _ => {
            // Hidden forwards carry no user ID to route back to.
            bot.send_message(msg.chat.id, get_text(lang, "contact.hidden_origin"))
                .await?;
            return Ok(());
        }
    };

    match bot.copy_message(target, msg.chat.id, msg.id).await {
        Ok(_) => {
            bot.send_message(msg.chat.id, get_text(lang, "contact.sent"))
                .await?;
        }
        Err(e) => {
            // The user may have blocked the bot in the meantime.
            let notice = get_text(lang, "contact.send_failed").replace("{error}", &e.to_string());
            bot.send_message(msg.chat.id, notice).await?;
        }
    }

    Ok(())
}

/// User side: forward the message to the owner and acknowledge.
async fn relay_to_owner(
    bot: &Bot,
    msg: &Message,
    info: &HostedBot,
    ctx: &HostedCtx,
    lang: &str,
) -> anyhow::Result<()> {
    let owner = ChatId(info.owner_id as i64);
    bot.forward_message(owner, msg.chat.id, msg.id).await?;

    // Mirror traffic to the platform log channel, best effort.
    if let Some(log_channel) = ctx.config.log_channel.as_deref() {
        let recipient = crate::guards::channel_recipient(log_channel);
        if let Err(e) = bot.forward_message(recipient, msg.chat.id, msg.id).await {
            debug!("Log channel forward failed for @{}: {}", info.username, e);
        }
    }

    bot.send_message(msg.chat.id, get_text(lang, "contact.sent"))
        .await?;
    Ok(())
}

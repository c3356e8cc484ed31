//! Required-channel membership gate with caching.

use teloxide::prelude::*;
use teloxide::types::{ChatId, ChatMemberKind, Recipient, UserId};
use tracing::debug;

use crate::cache::{CacheConfig, CacheRegistry, TypedCache};

/// Checks whether users joined the required channel.
///
/// Results are cached with a short TTL: membership checks hit the
/// Telegram API, and every manager-bot message passes through here.
#[derive(Clone)]
pub struct ChannelGate {
    cache: TypedCache<u64, bool>,
}

impl ChannelGate {
    pub fn new(cache: &CacheRegistry) -> Self {
        Self {
            cache: cache.get_or_create("channel_membership", CacheConfig::membership()),
        }
    }

    /// Check if a user is a member of the channel.
    pub async fn is_member(
        &self,
        bot: &Bot,
        channel: &str,
        user_id: UserId,
    ) -> anyhow::Result<bool> {
        if let Some(cached) = self.cache.get(&user_id.0) {
            debug!("Membership cache hit for user {}", user_id);
            return Ok(cached);
        }

        let member = bot
            .get_chat_member(channel_recipient(channel), user_id)
            .await?;

        let is_member = !matches!(member.kind, ChatMemberKind::Left | ChatMemberKind::Banned(_));

        self.cache.insert(user_id.0, is_member);
        Ok(is_member)
    }

    /// Drop a cached result (e.g. right after the user reports joining).
    #[allow(dead_code)]
    pub fn invalidate(&self, user_id: UserId) {
        self.cache.invalidate(&user_id.0);
    }
}

/// Turn a configured channel reference into a Telegram recipient.
/// Accepts `@username` or a numeric chat ID.
pub fn channel_recipient(channel: &str) -> Recipient {
    if let Ok(id) = channel.parse::<i64>() {
        Recipient::Id(ChatId(id))
    } else {
        Recipient::ChannelUsername(channel.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_recipient() {
        assert!(matches!(
            channel_recipient("@mychannel"),
            Recipient::ChannelUsername(_)
        ));
        assert!(matches!(
            channel_recipient("-1001234567890"),
            Recipient::Id(ChatId(-1001234567890))
        ));
    }
}

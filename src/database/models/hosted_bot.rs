//! Hosted bot model.

use serde::{Deserialize, Serialize};

/// Built-in behavior assigned to a hosted bot at deploy time.
///
/// Hosted bots run in-process; each token is bound to one of these
/// templates rather than user-supplied code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BotKind {
    /// Bilingual content bot (Quran verses / video links).
    Service,
    /// Feedback bot forwarding user messages to the owner.
    Contact,
}

/// A bot registered on the platform.
///
/// Removal is a soft delete: `is_active` flips to false and the token
/// stops receiving updates, but statistics are preserved.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HostedBot {
    /// Telegram ID of the owning user.
    pub owner_id: u64,
    /// Bot API token (unique).
    pub token: String,
    /// Display name chosen at deploy time.
    pub name: String,
    /// Bot username without @ (from getMe).
    pub username: String,
    /// Behavior template.
    pub kind: BotKind,
    pub is_active: bool,
    /// Unix timestamp of registration.
    pub created_at: i64,
    /// Unix timestamp of the last processed update.
    pub last_update: Option<i64>,
    pub total_updates: u64,
    pub total_messages: u64,
}

impl HostedBot {
    pub const COLLECTION: &'static str = "bots";

    pub fn new(owner_id: u64, token: &str, name: &str, username: &str, kind: BotKind) -> Self {
        Self {
            owner_id,
            token: token.to_string(),
            name: name.to_string(),
            username: username.to_string(),
            kind,
            is_active: true,
            created_at: chrono::Utc::now().timestamp(),
            last_update: None,
            total_updates: 0,
            total_messages: 0,
        }
    }

    /// Registration date formatted as YYYY-MM-DD for the stats card.
    pub fn created_date(&self) -> String {
        chrono::DateTime::from_timestamp(self.created_at, 0)
            .map(|dt| dt.format("%Y-%m-%d").to_string())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_defaults() {
        let bot = HostedBot::new(42, "123:abc", "MyBot", "my_bot", BotKind::Service);
        assert!(bot.is_active);
        assert_eq!(bot.total_updates, 0);
        assert_eq!(bot.total_messages, 0);
        assert!(bot.last_update.is_none());
    }

    #[test]
    fn test_created_date_format() {
        let mut bot = HostedBot::new(42, "123:abc", "MyBot", "my_bot", BotKind::Contact);
        bot.created_at = 1_700_000_000; // 2023-11-14 UTC
        assert_eq!(bot.created_date(), "2023-11-14");
    }

    #[test]
    fn test_kind_serde_roundtrip() {
        let json = serde_json::to_string(&BotKind::Contact).unwrap();
        assert_eq!(json, "\"contact\"");
        let kind: BotKind = serde_json::from_str("\"service\"").unwrap();
        assert_eq!(kind, BotKind::Service);
    }
}

//! Platform user model.
//!
//! Stores user data from Telegram plus platform state (language, activity).

use serde::{Deserialize, Serialize};
use teloxide::types::User;

/// A user of the hosting platform.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlatformUser {
    /// Telegram user ID.
    pub telegram_id: u64,
    /// Username without @ (lowercase for matching).
    pub username: Option<String>,
    /// First name.
    pub first_name: String,
    /// UI language code ("en" or "ar").
    pub language: String,
    /// Unix timestamp of first contact.
    pub created_at: i64,
    /// Unix timestamp of last activity.
    pub last_active: i64,
    /// False once the user blocked the bot (excluded from broadcasts).
    pub is_active: bool,
}

impl PlatformUser {
    pub const COLLECTION: &'static str = "users";

    /// Create a new PlatformUser from a Telegram User.
    pub fn from_telegram(user: &User) -> Self {
        let now = chrono::Utc::now().timestamp();
        Self {
            telegram_id: user.id.0,
            username: user.username.as_ref().map(|u| u.to_lowercase()),
            first_name: user.first_name.clone(),
            language: "en".to_string(),
            created_at: now,
            last_active: now,
            is_active: true,
        }
    }

    /// Check if user data has changed compared to the Telegram user.
    /// Language and activity flags are internal and not compared.
    pub fn has_changed(&self, other: &User) -> bool {
        let new_username = other.username.as_ref().map(|u| u.to_lowercase());
        self.username != new_username || self.first_name != other.first_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use teloxide::types::UserId;

    fn tg_user(id: u64, first_name: &str, username: Option<&str>) -> User {
        User {
            id: UserId(id),
            is_bot: false,
            first_name: first_name.to_string(),
            last_name: None,
            username: username.map(|s| s.to_string()),
            language_code: None,
            is_premium: false,
            added_to_attachment_menu: false,
        }
    }

    #[test]
    fn test_from_telegram_lowercases_username() {
        let user = PlatformUser::from_telegram(&tg_user(1, "Alice", Some("AliceBot")));
        assert_eq!(user.username.as_deref(), Some("alicebot"));
        assert_eq!(user.language, "en");
        assert!(user.is_active);
    }

    #[test]
    fn test_has_changed() {
        let stored = PlatformUser::from_telegram(&tg_user(1, "Alice", Some("alice")));
        assert!(!stored.has_changed(&tg_user(1, "Alice", Some("Alice"))));
        assert!(stored.has_changed(&tg_user(1, "Alicia", Some("alice"))));
        assert!(stored.has_changed(&tg_user(1, "Alice", None)));
    }
}

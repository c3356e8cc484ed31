//! Configuration module for the Telehost platform.
//!
//! Loads configuration from environment variables.

use std::env;

use serde::Deserialize;

/// Bot running mode
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BotMode {
    Polling,
    Webhook,
}

impl Default for BotMode {
    fn default() -> Self {
        Self::Polling
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    // Telegram
    pub main_bot_token: String,
    pub bot_mode: BotMode,

    /// Public base URL for webhook mode, e.g. `https://host.example.com`.
    /// The manager bot listens at `<base>/webhook/main`, hosted bots at
    /// `<base>/webhook/<token>`.
    pub webhook_base_url: Option<String>,

    /// HTTP port for the health/webhook server.
    pub port: u16,

    /// Admin user IDs (comma-separated).
    /// These users have access to the admin panel and bypass all gates.
    pub admin_ids: Vec<u64>,

    /// Channel users must join before using the platform (e.g. `@mychannel`).
    pub required_channel: Option<String>,

    /// Channel receiving platform event notifications (e.g. `@mylogs`).
    pub log_channel: Option<String>,

    // MongoDB
    pub mongodb_uri: String,
    pub mongodb_database: String,

    // Limits
    /// Maximum number of active hosted bots per user.
    pub max_bots_per_user: u32,
    /// Allowed actions per rate-limit window.
    pub rate_limit_actions: u32,
    /// Rate-limit window length in seconds.
    pub rate_limit_window_secs: u32,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Panics
    /// Panics if required environment variables are not set.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        // USE_POLLING=true (the default) means long polling; anything else
        // switches to webhook mode.
        let use_polling = env::var("USE_POLLING")
            .map(|v| v.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(true);

        let bot_mode = if use_polling {
            BotMode::Polling
        } else {
            BotMode::Webhook
        };

        let webhook_base_url = env::var("WEBHOOK_BASE_URL")
            .ok()
            .map(|s| s.trim_end_matches('/').to_string())
            .filter(|s| !s.is_empty());

        // Validate webhook URL is set if mode is webhook
        if bot_mode == BotMode::Webhook && webhook_base_url.is_none() {
            panic!("WEBHOOK_BASE_URL must be set when USE_POLLING is false");
        }

        let admin_ids = parse_admin_ids(&env::var("ADMIN_IDS").unwrap_or_default());

        Self {
            main_bot_token: env::var("MAIN_BOT_TOKEN").expect("MAIN_BOT_TOKEN must be set"),
            bot_mode,
            webhook_base_url,
            port: env_or("PORT", 10000),
            admin_ids,
            required_channel: parse_channel(env::var("REQUIRED_CHANNEL").ok()),
            log_channel: parse_channel(env::var("LOG_CHANNEL").ok()),
            mongodb_uri: env::var("MONGODB_URI").expect("MONGODB_URI must be set"),
            mongodb_database: env::var("MONGODB_DATABASE")
                .unwrap_or_else(|_| "telehost".to_string()),
            max_bots_per_user: env_or("MAX_BOTS_PER_USER", 3),
            rate_limit_actions: env_or("RATE_LIMIT_ACTIONS", 5),
            rate_limit_window_secs: env_or("RATE_LIMIT_WINDOW", 10),
        }
    }

    /// Check if a user is a platform admin.
    pub fn is_admin(&self, user_id: u64) -> bool {
        self.admin_ids.contains(&user_id)
    }

    /// Webhook URL for the manager bot.
    pub fn manager_webhook_url(&self) -> Option<String> {
        self.webhook_base_url
            .as_ref()
            .map(|base| format!("{}/webhook/main", base))
    }

    /// Webhook URL for a hosted bot identified by its token.
    pub fn hosted_webhook_url(&self, token: &str) -> Option<String> {
        self.webhook_base_url
            .as_ref()
            .map(|base| format!("{}/webhook/{}", base, token))
    }
}

/// Parse a comma-separated list of admin user IDs.
fn parse_admin_ids(raw: &str) -> Vec<u64> {
    raw.split(',')
        .filter_map(|s| s.trim().parse::<u64>().ok())
        .collect()
}

/// Normalize an optional channel reference: ensure a leading `@`,
/// drop empty values.
fn parse_channel(raw: Option<String>) -> Option<String> {
    let s = raw?.trim().to_string();
    if s.is_empty() {
        return None;
    }
    if s.starts_with('@') || s.starts_with('-') {
        Some(s)
    } else {
        Some(format!("@{}", s))
    }
}

/// Read an env var and parse it, falling back to a default.
fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_admin_ids() {
        assert_eq!(parse_admin_ids("1, 2,3"), vec![1, 2, 3]);
        assert_eq!(parse_admin_ids(""), Vec::<u64>::new());
        assert_eq!(parse_admin_ids("abc,42"), vec![42]);
    }

    #[test]
    fn test_parse_channel() {
        assert_eq!(parse_channel(None), None);
        assert_eq!(parse_channel(Some("".into())), None);
        assert_eq!(parse_channel(Some("mychannel".into())), Some("@mychannel".into()));
        assert_eq!(parse_channel(Some("@mychannel".into())), Some("@mychannel".into()));
        assert_eq!(parse_channel(Some("-1001234".into())), Some("-1001234".into()));
    }
}

//! Statistics models.
//!
//! Per-day counters live in the `daily_stats` collection keyed by
//! (token, date); lifetime totals live on the bot document itself.

use serde::{Deserialize, Serialize};

/// Aggregated platform-wide statistics for the admin panel.
#[derive(Clone, Debug, Default)]
pub struct GlobalStats {
    pub total_users: u64,
    pub total_bots: u64,
    pub total_updates: u64,
    pub total_messages: u64,
    pub top_bot: Option<TopBot>,
}

/// The most active hosted bot by lifetime updates.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TopBot {
    pub name: String,
    pub total_updates: u64,
}

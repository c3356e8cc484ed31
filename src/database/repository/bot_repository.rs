//! Hosted bot repository with token-keyed caching.
//!
//! The token -> bot lookup runs on every hosted webhook request, so it is
//! aggressively cached. Writes go through this repo to keep the cache
//! coherent.

use anyhow::Result;
use futures::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::Collection;
use tracing::debug;

use super::super::models::{GlobalStats, HostedBot, TopBot};
use super::super::Database;
use crate::cache::{CacheConfig, CacheRegistry, TypedCache};

/// Repository for hosted bot registrations.
pub struct BotRepo {
    collection: Collection<HostedBot>,
    cache_by_token: TypedCache<String, HostedBot>,
}

impl BotRepo {
    pub fn new(db: &Database, cache: &CacheRegistry) -> Self {
        let cache_by_token = cache.get_or_create("bots_by_token", CacheConfig::bot_lookup());

        Self {
            collection: db.collection(HostedBot::COLLECTION),
            cache_by_token,
        }
    }

    /// Find an active bot by its token.
    pub async fn find_by_token(&self, token: &str) -> Result<Option<HostedBot>> {
        if let Some(bot) = self.cache_by_token.get(&token.to_string()) {
            return Ok(Some(bot));
        }

        let filter = doc! { "token": token, "is_active": true };
        let result = self.collection.find_one(filter).await?;

        if let Some(bot) = &result {
            self.cache_by_token.insert(token.to_string(), bot.clone());
        }

        Ok(result)
    }

    /// Check whether a token belongs to a soft-deleted registration.
    pub async fn find_inactive(&self, token: &str) -> Result<Option<HostedBot>> {
        let filter = doc! { "token": token, "is_active": false };
        Ok(self.collection.find_one(filter).await?)
    }

    /// Insert a new registration.
    pub async fn insert(&self, bot: &HostedBot) -> Result<()> {
        self.collection.insert_one(bot).await?;
        self.cache_by_token.insert(bot.token.clone(), bot.clone());
        debug!("Registered bot @{} for user {}", bot.username, bot.owner_id);
        Ok(())
    }

    /// Re-activate a soft-deleted registration under a new owner/kind.
    pub async fn reactivate(&self, bot: &HostedBot) -> Result<()> {
        let filter = doc! { "token": &bot.token };
        self.collection
            .update_one(filter, Self::reactivation_update(bot)?)
            .await?;
        self.cache_by_token.invalidate(&bot.token);
        debug!("Re-activated bot @{}", bot.username);
        Ok(())
    }

    /// `$set` document for reviving a soft-deleted registration.
    ///
    /// Only ownership fields are rewritten; lifetime counters and the
    /// original registration date survive removal and re-deploy.
    fn reactivation_update(bot: &HostedBot) -> Result<Document> {
        Ok(doc! { "$set": {
            "is_active": true,
            "owner_id": bot.owner_id as i64,
            "name": &bot.name,
            "username": &bot.username,
            "kind": mongodb::bson::to_bson(&bot.kind)?,
        }})
    }

    /// Soft-delete a registration. Returns true if a bot was deactivated.
    pub async fn deactivate(&self, token: &str) -> Result<bool> {
        let filter = doc! { "token": token, "is_active": true };
        let update = doc! { "$set": { "is_active": false } };
        let result = self.collection.update_one(filter, update).await?;
        self.cache_by_token.invalidate(&token.to_string());
        Ok(result.modified_count > 0)
    }

    /// List a user's active bots, newest first.
    pub async fn list_by_owner(&self, owner_id: u64) -> Result<Vec<HostedBot>> {
        let filter = doc! { "owner_id": owner_id as i64, "is_active": true };
        let cursor = self
            .collection
            .find(filter)
            .sort(doc! { "created_at": -1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    /// Find one of a user's active bots by its username.
    pub async fn find_owned_by_username(
        &self,
        owner_id: u64,
        username: &str,
    ) -> Result<Option<HostedBot>> {
        let filter = doc! {
            "owner_id": owner_id as i64,
            "username": username,
            "is_active": true,
        };
        Ok(self.collection.find_one(filter).await?)
    }

    /// Count a user's active bots (per-user cap enforcement).
    pub async fn count_active_for(&self, owner_id: u64) -> Result<u64> {
        let filter = doc! { "owner_id": owner_id as i64, "is_active": true };
        Ok(self.collection.count_documents(filter).await?)
    }

    /// List every active bot (startup reload).
    pub async fn list_active(&self) -> Result<Vec<HostedBot>> {
        let cursor = self.collection.find(doc! { "is_active": true }).await?;
        Ok(cursor.try_collect().await?)
    }

    /// Bump lifetime counters for a processed update.
    ///
    /// The cache entry is invalidated rather than patched; the next webhook
    /// hit re-reads fresh counters.
    pub async fn increment_totals(&self, token: &str, is_message: bool) -> Result<()> {
        let filter = doc! { "token": token, "is_active": true };
        let update = doc! {
            "$inc": {
                "total_updates": 1,
                "total_messages": if is_message { 1 } else { 0 },
            },
            "$set": { "last_update": chrono::Utc::now().timestamp() },
        };
        self.collection.update_one(filter, update).await?;
        self.cache_by_token.invalidate(&token.to_string());
        Ok(())
    }

    /// Platform-wide aggregates for the admin panel.
    pub async fn global_stats(&self, total_users: u64) -> Result<GlobalStats> {
        let total_bots = self
            .collection
            .count_documents(doc! { "is_active": true })
            .await?;

        // Sum lifetime counters across all bots (including removed ones,
        // matching how totals were accumulated).
        let pipeline = vec![doc! { "$group": {
            "_id": null,
            "updates": { "$sum": "$total_updates" },
            "messages": { "$sum": "$total_messages" },
        }}];
        let mut cursor = self.collection.aggregate(pipeline).await?;
        let (total_updates, total_messages) = match cursor.try_next().await? {
            Some(sum) => (
                Self::doc_counter(&sum, "updates"),
                Self::doc_counter(&sum, "messages"),
            ),
            None => (0, 0),
        };

        let top_bot = self.top_bot().await?;

        Ok(GlobalStats {
            total_users,
            total_bots,
            total_updates,
            total_messages,
            top_bot,
        })
    }

    /// The most active bot by lifetime updates.
    async fn top_bot(&self) -> Result<Option<TopBot>> {
        let filter = doc! { "is_active": true };
        let result = self
            .collection
            .find_one(filter)
            .sort(doc! { "total_updates": -1 })
            .await?;
        Ok(result.map(|bot| TopBot {
            name: bot.name,
            total_updates: bot.total_updates,
        }))
    }

    /// Helper for raw aggregation sums that may come back as Int32.
    fn doc_counter(doc: &Document, key: &str) -> u64 {
        doc.get_i64(key)
            .ok()
            .or_else(|| doc.get_i32(key).ok().map(i64::from))
            .unwrap_or(0)
            .max(0) as u64
    }
}

impl Clone for BotRepo {
    fn clone(&self) -> Self {
        Self {
            collection: self.collection.clone(),
            cache_by_token: self.cache_by_token.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::BotKind;

    #[test]
    fn test_reactivation_preserves_counters() {
        let bot = HostedBot::new(7, "1:a", "A", "a_bot", BotKind::Contact);
        let update = BotRepo::reactivation_update(&bot).unwrap();
        let set = update.get_document("$set").unwrap();

        assert!(set.get_bool("is_active").unwrap());
        assert_eq!(set.get_i64("owner_id").unwrap(), 7);
        assert_eq!(set.get_str("username").unwrap(), "a_bot");

        // Counters and the registration date must survive a re-deploy.
        for key in ["total_updates", "total_messages", "created_at", "last_update"] {
            assert!(!set.contains_key(key), "{} must not be rewritten", key);
        }
    }
}

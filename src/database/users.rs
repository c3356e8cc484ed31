//! User repository with cache-first architecture.
//!
//! Tracks platform users and their UI language. Every manager-bot update
//! touches this repo, so reads are served from cache where possible.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use futures::TryStreamExt;
use mongodb::bson::doc;
use mongodb::Collection;
use teloxide::types::User;
use tokio::spawn;
use tracing::{debug, warn};

use super::models::PlatformUser;
use super::Database;
use crate::cache::{CacheConfig, CacheRegistry, TypedCache};

/// Repository for platform users.
pub struct UserRepo {
    collection: Collection<PlatformUser>,
    cache: TypedCache<u64, PlatformUser>,
}

impl UserRepo {
    /// Create a new UserRepo with caching.
    pub fn new(db: &Database, cache: &CacheRegistry) -> Self {
        let cache = cache.get_or_create(
            "users_by_id",
            CacheConfig::with_capacity(10_000).ttl(Duration::from_secs(3600)),
        );

        Self {
            collection: db.collection(PlatformUser::COLLECTION),
            cache,
        }
    }

    /// Upsert user data (update or insert), refreshing `last_active`.
    /// Preserves the stored language choice. Updates cache immediately.
    pub async fn upsert(&self, user: &User) -> Result<PlatformUser> {
        let telegram_id = user.id.0;
        let now = chrono::Utc::now().timestamp();

        let mut stored = match self.get_by_id(telegram_id).await? {
            Some(existing) => {
                let mut updated = existing.clone();
                if existing.has_changed(user) {
                    updated.username = user.username.as_ref().map(|u| u.to_lowercase());
                    updated.first_name = user.first_name.clone();
                }
                updated
            }
            None => PlatformUser::from_telegram(user),
        };
        stored.last_active = now;
        stored.is_active = true;

        let filter = doc! { "telegram_id": telegram_id as i64 };
        let options = mongodb::options::ReplaceOptions::builder()
            .upsert(true)
            .build();

        self.collection
            .replace_one(filter, &stored)
            .with_options(options)
            .await?;

        self.cache.insert(telegram_id, stored.clone());
        debug!("Upserted user {} (@{:?})", telegram_id, stored.username);

        Ok(stored)
    }

    /// Upsert user in background (non-blocking).
    pub fn upsert_background(self: Arc<Self>, user: User) {
        spawn(async move {
            if let Err(e) = self.upsert(&user).await {
                warn!("Failed to upsert user {}: {}", user.id, e);
            }
        });
    }

    /// Get user by Telegram ID.
    pub async fn get_by_id(&self, telegram_id: u64) -> Result<Option<PlatformUser>> {
        if let Some(user) = self.cache.get(&telegram_id) {
            return Ok(Some(user));
        }

        let filter = doc! { "telegram_id": telegram_id as i64 };
        let result = self.collection.find_one(filter).await?;

        if let Some(user) = &result {
            self.cache.insert(telegram_id, user.clone());
        }

        Ok(result)
    }

    /// Get a user's UI language, defaulting to "en".
    pub async fn get_language(&self, telegram_id: u64) -> String {
        match self.get_by_id(telegram_id).await {
            Ok(Some(user)) => user.language,
            _ => "en".to_string(),
        }
    }

    /// Persist a user's UI language choice.
    pub async fn set_language(&self, telegram_id: u64, language: &str) -> Result<()> {
        let filter = doc! { "telegram_id": telegram_id as i64 };
        let update = doc! { "$set": { "language": language } };
        self.collection.update_one(filter, update).await?;

        if let Some(mut user) = self.cache.get(&telegram_id) {
            user.language = language.to_string();
            self.cache.insert(telegram_id, user);
        }

        Ok(())
    }

    /// Mark a user inactive (e.g. they blocked the bot during a broadcast).
    pub async fn deactivate(&self, telegram_id: u64) -> Result<()> {
        let filter = doc! { "telegram_id": telegram_id as i64 };
        let update = doc! { "$set": { "is_active": false } };
        self.collection.update_one(filter, update).await?;
        self.cache.invalidate(&telegram_id);
        Ok(())
    }

    /// List Telegram IDs of all active users (broadcast targets).
    pub async fn active_ids(&self) -> Result<Vec<u64>> {
        let cursor = self.collection.find(doc! { "is_active": true }).await?;
        let users: Vec<PlatformUser> = cursor.try_collect().await?;
        Ok(users.into_iter().map(|u| u.telegram_id).collect())
    }

    /// Count all users ever seen.
    pub async fn count(&self) -> Result<u64> {
        Ok(self.collection.count_documents(doc! {}).await?)
    }
}

impl Clone for UserRepo {
    fn clone(&self) -> Self {
        Self {
            collection: self.collection.clone(),
            cache: self.cache.clone(),
        }
    }
}

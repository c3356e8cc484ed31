//! Daily statistics repository.
//!
//! One document per (token, date), upserted with `$inc` so concurrent
//! updates never lose counts.

use anyhow::Result;
use mongodb::bson::doc;
use mongodb::bson::Document;
use mongodb::Collection;

use super::super::Database;

/// Repository for per-day update/message counters.
pub struct StatsRepo {
    collection: Collection<Document>,
}

impl StatsRepo {
    pub const COLLECTION: &'static str = "daily_stats";

    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(Self::COLLECTION),
        }
    }

    /// Record one processed update for today.
    /// Message updates also bump the message counter.
    pub async fn bump(&self, token: &str, is_message: bool) -> Result<()> {
        let date = chrono::Utc::now().date_naive().to_string();
        let filter = doc! { "token": token, "date": &date };

        let update = doc! { "$inc": {
            "updates_count": 1,
            "messages_count": if is_message { 1 } else { 0 },
        }};

        let options = mongodb::options::UpdateOptions::builder()
            .upsert(true)
            .build();

        self.collection
            .update_one(filter, update)
            .with_options(options)
            .await?;

        Ok(())
    }
}

impl Clone for StatsRepo {
    fn clone(&self) -> Self {
        Self {
            collection: self.collection.clone(),
        }
    }
}

//! Service content repository.

use anyhow::Result;
use futures::TryStreamExt;
use mongodb::bson::doc;
use mongodb::Collection;

use super::super::models::{ContentKind, ServiceContent};
use super::super::Database;

/// Repository for content served by hosted service bots.
pub struct ContentRepo {
    collection: Collection<ServiceContent>,
}

impl ContentRepo {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(ServiceContent::COLLECTION),
        }
    }

    /// Pick one random entry of the given kind.
    pub async fn random(&self, kind: ContentKind) -> Result<Option<ServiceContent>> {
        let pipeline = vec![
            doc! { "$match": { "kind": kind.as_str() } },
            doc! { "$sample": { "size": 1 } },
        ];

        let mut cursor = self.collection.aggregate(pipeline).await?;
        match cursor.try_next().await? {
            Some(document) => Ok(Some(mongodb::bson::from_document(document)?)),
            None => Ok(None),
        }
    }
}

impl Clone for ContentRepo {
    fn clone(&self) -> Self {
        Self {
            collection: self.collection.clone(),
        }
    }
}

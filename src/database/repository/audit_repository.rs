//! Audit log repository.

use std::sync::Arc;

use anyhow::Result;
use mongodb::Collection;
use tokio::spawn;
use tracing::warn;

use super::super::models::AuditEntry;
use super::super::Database;

/// Repository for audited platform actions.
pub struct AuditRepo {
    collection: Collection<AuditEntry>,
}

impl AuditRepo {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(AuditEntry::COLLECTION),
        }
    }

    /// Record an action.
    pub async fn record(&self, user_id: u64, action: &str, details: Option<String>) -> Result<()> {
        let entry = AuditEntry::new(user_id, action, details);
        self.collection.insert_one(entry).await?;
        Ok(())
    }

    /// Record an action in the background (non-blocking).
    /// Audit failures are logged, never surfaced to the user.
    pub fn record_background(self: Arc<Self>, user_id: u64, action: &str, details: Option<String>) {
        let action = action.to_string();
        spawn(async move {
            if let Err(e) = self.record(user_id, &action, details).await {
                warn!("Failed to audit '{}' for user {}: {}", action, user_id, e);
            }
        });
    }
}

impl Clone for AuditRepo {
    fn clone(&self) -> Self {
        Self {
            collection: self.collection.clone(),
        }
    }
}

//! Audit log model.

use serde::{Deserialize, Serialize};

/// A single audited platform action (start, deploy, removal, broadcast).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Telegram ID of the acting user.
    pub user_id: u64,
    /// Action name, e.g. "deploy".
    pub action: String,
    /// Optional free-form details.
    pub details: Option<String>,
    /// Unix timestamp.
    pub timestamp: i64,
}

impl AuditEntry {
    pub const COLLECTION: &'static str = "audit_log";

    pub fn new(user_id: u64, action: &str, details: Option<String>) -> Self {
        Self {
            user_id,
            action: action.to_string(),
            details,
            timestamp: chrono::Utc::now().timestamp(),
        }
    }
}

//! Service content model.
//!
//! Content served by hosted service bots (seeded at startup,
//! extendable by operators directly in the collection).

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Quran,
    Video,
}

impl ContentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Quran => "quran",
            Self::Video => "video",
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServiceContent {
    pub kind: ContentKind,
    pub content: String,
    pub description: Option<String>,
    pub created_at: i64,
}

impl ServiceContent {
    pub const COLLECTION: &'static str = "service_content";

    pub fn new(kind: ContentKind, content: &str, description: &str) -> Self {
        Self {
            kind,
            content: content.to_string(),
            description: Some(description.to_string()),
            created_at: chrono::Utc::now().timestamp(),
        }
    }
}

//! Data models for persisted platform entities.

mod audit;
mod content;
mod hosted_bot;
mod stats;
mod user;

pub use audit::AuditEntry;
pub use content::{ContentKind, ServiceContent};
pub use hosted_bot::{BotKind, HostedBot};
pub use stats::{GlobalStats, TopBot};
pub use user::PlatformUser;

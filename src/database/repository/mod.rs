//! Repositories for platform collections.

mod audit_repository;
mod bot_repository;
mod content_repository;
mod stats_repository;

pub use audit_repository::AuditRepo;
pub use bot_repository::BotRepo;
pub use content_repository::ContentRepo;
pub use stats_repository::StatsRepo;

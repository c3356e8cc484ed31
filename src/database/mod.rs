//! Database module exports.

mod models;
mod mongo;
mod repository;
mod users;

pub use models::*;
pub use mongo::Database;
pub use repository::{AuditRepo, BotRepo, ContentRepo, StatsRepo};
pub use users::UserRepo;

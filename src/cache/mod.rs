//! Cache module - Moka-backed caching.
//!
//! A registry of named, typed caches. Repositories and guards create
//! their own caches by name, keeping cache policy local to the code
//! that owns the data.

mod config;
mod registry;
mod typed;

pub use config::CacheConfig;
pub use registry::CacheRegistry;
pub use typed::TypedCache;

//! TimeClerk Core
//!
//! Foundational pieces shared by the TimeClerk Assistant workspace:
//! - `error` - core error types (thiserror-based, dependency-light)
//! - `cache` - generic key/value store with per-entry TTL and statistics
//! - `role` - the role model used for tool gating and cache administration

pub mod cache;
pub mod error;
pub mod role;

// Re-export main types
pub use cache::{CacheStats, CacheStore};
pub use error::{CoreError, CoreResult};
pub use role::Role;

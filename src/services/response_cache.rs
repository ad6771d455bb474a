//! Conversation Response Cache
//!
//! Caches completed assistant replies keyed by (user, role, normalized
//! message), so a user repeating a question inside the TTL window gets an
//! instant answer without a backend round trip. The role is part of the key
//! because the same question can legitimately produce different answers for
//! different roles.
//!
//! Normalization is cosmetic only (case, surrounding and internal runs of
//! whitespace); no stemming or synonym folding, so two phrasings of the same
//! question are distinct entries.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use timeclerk_core::{CacheStats, CacheStore, Role};
use timeclerk_tools::ActionCommand;

/// The cacheable portion of a chat turn.
///
/// The `cached` flag on the outgoing response is set per lookup, so it never
/// lives in the stored entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedReply {
    pub response: String,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<ActionCommand>,
}

/// TTL cache of completed assistant replies.
pub struct ResponseCache {
    store: CacheStore<CachedReply>,
    ttl: Duration,
}

impl ResponseCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            store: CacheStore::new(),
            ttl,
        }
    }

    /// Cache key for one (user, role, message) combination.
    pub fn key(user_id: &str, role: Role, message: &str) -> String {
        format!("chat:{}:{}:{}", user_id, role.as_str(), normalize(message))
    }

    pub fn get(&self, key: &str) -> Option<CachedReply> {
        self.store.get(key)
    }

    pub fn put(&self, key: String, reply: CachedReply) {
        self.store.put(key, reply, self.ttl);
    }

    pub fn stats(&self) -> CacheStats {
        self.store.stats()
    }

    pub fn invalidate_all(&self) {
        self.store.invalidate_all();
    }
}

/// Lowercase, trim, and collapse internal whitespace runs to single spaces.
fn normalize(message: &str) -> String {
    message
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

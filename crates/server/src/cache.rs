//! Response cache for recommendation lists.
//!
//! Injected into the HTTP state as `Option<Arc<dyn ResponseCache>>`; the
//! orchestrator itself knows nothing about caching. Entries expire after
//! the TTL given to `set`; every `set` drops the entries that have expired.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use catalog::Film;
use tokio::sync::RwLock;
use tokio::time::Instant;

/// Keyed store of film lists with per-entry expiry
#[async_trait]
pub trait ResponseCache: Send + Sync {
    /// Cached films for `key`, if present and not expired
    async fn get(&self, key: &str) -> Option<Vec<Film>>;

    async fn set(&self, key: &str, films: Vec<Film>, ttl: Duration);

    async fn invalidate(&self, key: &str);
}

struct Entry {
    films: Vec<Film>,
    expires_at: Instant,
}

/// In-process `ResponseCache`
#[derive(Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, Entry>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, expired ones included
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl ResponseCache for MemoryCache {
    async fn get(&self, key: &str) -> Option<Vec<Film>> {
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some(entry) if entry.expires_at > Instant::now() => {
                    return Some(entry.films.clone());
                }
                Some(_) => {}
                None => return None,
            }
        }

        // Expired
        self.entries.write().await.remove(key);
        None
    }

    async fn set(&self, key: &str, films: Vec<Film>, ttl: Duration) {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        entries.retain(|_, entry| entry.expires_at > now);
        entries.insert(
            key.to_string(),
            Entry {
                films,
                expires_at: now + ttl,
            },
        );
    }

    async fn invalidate(&self, key: &str) {
        self.entries.write().await.remove(key);
    }
}

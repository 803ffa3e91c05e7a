#[cfg(test)]
#[path = "query_cache_test.rs"]
mod tests;

use std::future::Future;

use dashmap::DashMap;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::domain::models::CacheKey;
use crate::domain::models::RequestError;

struct CacheEntry {
    value: Value,
    stale: bool,
}

/// Server data shared between screens. Invalidated entries are kept but
/// refetched on their next read.
#[derive(Default)]
pub struct QueryCache {
    entries: DashMap<CacheKey, CacheEntry>,
}

impl QueryCache {
    pub fn set<T: Serialize>(&self, key: CacheKey, value: &T) {
        match serde_json::to_value(value) {
            Ok(value) => {
                self.entries
                    .insert(key, CacheEntry { value, stale: false });
            }
            Err(err) => {
                tracing::error!(error = ?err, key = ?key, "Failed to cache value");
            }
        }
    }

    /// Fresh cached value, if any.
    pub fn get<T: DeserializeOwned>(&self, key: &CacheKey) -> Option<T> {
        let entry = self.entries.get(key)?;
        if entry.stale {
            return None;
        }

        return serde_json::from_value::<T>(entry.value.clone()).ok();
    }

    pub fn invalidate(&self, key: &CacheKey) {
        if let Some(mut entry) = self.entries.get_mut(key) {
            entry.stale = true;
            tracing::debug!(key = ?key, "Cache entry invalidated");
        }
    }

    pub fn is_stale(&self, key: &CacheKey) -> bool {
        return self
            .entries
            .get(key)
            .map(|e| return e.stale)
            .unwrap_or(true);
    }

    pub async fn get_or_fetch<T, F, Fut>(&self, key: CacheKey, fetch: F) -> Result<T, RequestError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, RequestError>>,
    {
        if let Some(value) = self.get::<T>(&key) {
            return Ok(value);
        }

        let value = fetch().await?;
        self.set(key, &value);
        return Ok(value);
    }
}

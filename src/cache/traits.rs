// Cache trait — backend-agnostic async interface for verdict storage.
//
// Implementors: MemoryCache (in-process TTL map), NullCache (no-op
// default). Values are serialized CheckResult JSON; the engine owns
// (de)serialization so stores only ever see strings.
//
// The multi-key operations are defined as the per-key operation applied
// independently — there is no atomicity guarantee across keys.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// A cache read or write failure. The engine treats read failures as a
/// miss and write failures as non-fatal, so these surface in logs, not
/// to callers.
#[derive(Debug, Error)]
#[error("cache {operation} failed for key {key}: {reason}")]
pub struct CacheError {
    pub operation: &'static str,
    pub key: String,
    pub reason: String,
}

impl CacheError {
    pub fn new(operation: &'static str, key: &str, reason: impl ToString) -> Self {
        Self {
            operation,
            key: key.to_string(),
            reason: reason.to_string(),
        }
    }
}

#[async_trait]
pub trait Cache: Send + Sync {
    /// Look up a value. `Ok(None)` is a miss.
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Store a value with the given time-to-live. Returns whether the
    /// store accepted the write.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<bool, CacheError>;

    /// Remove a key. Returns whether an entry was removed.
    async fn delete(&self, key: &str) -> Result<bool, CacheError>;

    /// Per-key `get` over many keys; missing keys are absent from the map.
    async fn get_many(&self, keys: &[String]) -> Result<HashMap<String, String>, CacheError> {
        let mut found = HashMap::new();
        for key in keys {
            if let Some(value) = self.get(key).await? {
                found.insert(key.clone(), value);
            }
        }
        Ok(found)
    }

    /// Per-key `set`; true only if every write was accepted.
    async fn set_many(
        &self,
        entries: &[(String, String)],
        ttl: Duration,
    ) -> Result<bool, CacheError> {
        let mut all_accepted = true;
        for (key, value) in entries {
            all_accepted &= self.set(key, value, ttl).await?;
        }
        Ok(all_accepted)
    }

    /// Per-key `delete`; true only if every key had an entry.
    async fn delete_many(&self, keys: &[String]) -> Result<bool, CacheError> {
        let mut all_removed = true;
        for key in keys {
            all_removed &= self.delete(key).await?;
        }
        Ok(all_removed)
    }
}

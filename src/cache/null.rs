// No-op cache — the default adapter when caching is disabled.
//
// Always misses on read and reports success on write, so the engine's
// cache path works unconditionally and callers never branch on "no
// cache installed".

use std::time::Duration;

use async_trait::async_trait;

use super::traits::{Cache, CacheError};

pub struct NullCache;

#[async_trait]
impl Cache for NullCache {
    async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: &str, _ttl: Duration) -> Result<bool, CacheError> {
        Ok(true)
    }

    async fn delete(&self, _key: &str) -> Result<bool, CacheError> {
        Ok(true)
    }
}

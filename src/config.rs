// Checker configuration — cache wiring, retry/timeout policy, fan-out bound.
//
// Built fluently before the first check and read-only afterwards. The
// cache defaults to the no-op adapter so the engine never branches on
// "no cache installed"; installing a real adapter enables caching
// implicitly, mirroring the enable flag's derivation from the adapter.

use std::sync::Arc;
use std::time::Duration;

use crate::cache::{Cache, NullCache};

pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(3600);
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_RETRIES: u32 = 1;
pub const DEFAULT_CONCURRENCY: usize = 8;

#[derive(Clone)]
pub struct CheckerConfig {
    cache: Arc<dyn Cache>,
    cache_ttl: Duration,
    cache_enabled: bool,
    timeout: Duration,
    retries: u32,
    concurrency: usize,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            cache: Arc::new(NullCache),
            cache_ttl: DEFAULT_CACHE_TTL,
            cache_enabled: false,
            timeout: DEFAULT_TIMEOUT,
            retries: DEFAULT_RETRIES,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

impl CheckerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a cache adapter and enable caching.
    pub fn with_cache(mut self, cache: Arc<dyn Cache>) -> Self {
        self.cache = cache;
        self.cache_enabled = true;
        self
    }

    /// Toggle caching without replacing the installed adapter.
    pub fn enable_cache(mut self, enabled: bool) -> Self {
        self.cache_enabled = enabled;
        self
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Per-attempt deadline for one provider call. Exceeding it counts
    /// as a transport failure eligible for retry.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Additional attempts after the initial one (1 = one retry).
    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// Upper bound on concurrent provider calls, across providers of a
    /// single check and across URLs of a batch.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn cache(&self) -> &Arc<dyn Cache> {
        &self.cache
    }

    pub fn cache_ttl(&self) -> Duration {
        self.cache_ttl
    }

    pub fn cache_enabled(&self) -> bool {
        self.cache_enabled
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn retries(&self) -> u32 {
        self.retries
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }
}

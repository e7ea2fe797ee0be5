// Provider trait — the capability every reputation backend implements.
//
// One implementing type per vendor, dispatched dynamically by the
// checker. Implementations must be async because every backend is an
// HTTP API call.

use std::fmt::Debug;

use anyhow::Result;
use async_trait::async_trait;

use crate::result::CheckResult;

#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// The registry name of this provider, e.g. "phishtank".
    fn name(&self) -> &str;

    /// Check a single URL against the backend.
    ///
    /// Must be idempotent and side-effect-free with respect to the
    /// provider's own state — the engine retries it freely.
    async fn check(&self, url: &str) -> Result<CheckResult>;

    /// Check multiple URLs, returning each URL's outcome in caller
    /// order. One URL's failure never short-circuits the rest — every
    /// entry carries its own result. Providers with a native batch
    /// endpoint can override this.
    async fn check_batch(&self, urls: &[String]) -> Vec<(String, Result<CheckResult>)> {
        let mut results = Vec::with_capacity(urls.len());
        for url in urls {
            results.push((url.clone(), self.check(url).await));
        }
        results
    }
}

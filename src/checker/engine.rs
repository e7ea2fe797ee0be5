// Aggregation engine — runs one URL through a set of providers.
//
// Per provider the flow is: cache lookup → on miss, live call wrapped
// in timeout + retry → cache store. Provider calls fan out concurrently
// under the configured bound; a provider that fails after retries is
// recorded on the aggregate and never disturbs the other providers.
//
// Cache policy: read errors and corrupt entries degrade to a miss,
// write errors are logged and the live result is returned anyway.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::cache::cache_key;
use crate::config::CheckerConfig;
use crate::error::CheckError;
use crate::provider::{execute_with_retry, normalize_url, Provider};
use crate::result::{AggregateResult, CheckResult, Consensus};

/// Check a URL against every resolved provider and reduce the verdicts.
pub(crate) async fn check_url(
    providers: &[(String, Arc<dyn Provider>)],
    config: &CheckerConfig,
    url: &str,
    consensus: Consensus,
) -> AggregateResult {
    let normalized = normalize_url(url);
    let mut aggregate = AggregateResult::new(&normalized);

    // `buffered` (not `buffer_unordered`) keeps the aggregate's
    // insertion order equal to provider iteration order.
    let mut futures = Vec::with_capacity(providers.len());
    for (name, provider) in providers.to_vec() {
        futures.push(run_one(name, provider, config, normalized.as_str()));
    }
    let outcomes: Vec<(String, Result<CheckResult, CheckError>)> = stream::iter(futures)
        .buffered(config.concurrency())
        .collect()
        .await;

    for (name, outcome) in outcomes {
        match outcome {
            Ok(result) => {
                aggregate.add_provider_result(&name, result);
            }
            Err(error) => {
                warn!(provider = %name, url = normalized, error = %error, "provider check failed, continuing with the rest");
                aggregate.add_failure(&name, error);
            }
        }
    }

    aggregate.determine_overall_safety(consensus);
    aggregate
}

/// Run one provider's check as an owned, concrete future.
///
/// Factored out of `check_url`'s stream so the per-provider future is a
/// named `async fn`'s opaque type rather than a closure-captured
/// generator — that is what lets the enclosing `check` future satisfy
/// `tokio::spawn`'s `Send + 'static` bound.
async fn run_one(
    name: String,
    provider: Arc<dyn Provider>,
    config: &CheckerConfig,
    normalized: &str,
) -> (String, Result<CheckResult, CheckError>) {
    let outcome = check_with_provider(&name, provider.as_ref(), config, normalized).await;
    (name, outcome)
}

/// One provider's check: cache, then live with timeout + retry.
///
/// `normalized_url` must already be normalized — the cache key and the
/// backend call both use it as-is.
pub(crate) async fn check_with_provider(
    name: &str,
    provider: &dyn Provider,
    config: &CheckerConfig,
    normalized_url: &str,
) -> Result<CheckResult, CheckError> {
    let key = cache_key(name, normalized_url);

    if config.cache_enabled() {
        match config.cache().get(&key).await {
            Ok(Some(raw)) => match serde_json::from_str::<CheckResult>(&raw) {
                Ok(cached) => {
                    debug!(provider = name, url = normalized_url, "cache hit");
                    return Ok(cached);
                }
                Err(error) => {
                    warn!(provider = name, error = %error, "corrupt cache entry, falling through to live check");
                }
            },
            Ok(None) => {}
            Err(error) => {
                warn!(provider = name, error = %error, "cache read failed, treating as miss");
            }
        }
    }

    let per_attempt = config.timeout();
    let live = execute_with_retry(config.retries(), || async move {
        match timeout(per_attempt, provider.check(normalized_url)).await {
            Ok(outcome) => outcome,
            Err(_) => anyhow::bail!("timed out after {per_attempt:?}"),
        }
    })
    .await
    .map_err(|reason| CheckError::ProviderTransport {
        provider: name.to_string(),
        url: normalized_url.to_string(),
        reason,
    })?;

    if config.cache_enabled() {
        match serde_json::to_string(&live) {
            Ok(raw) => {
                if let Err(error) = config.cache().set(&key, &raw, config.cache_ttl()).await {
                    warn!(provider = name, error = %error, "cache write failed, returning uncached result");
                }
            }
            Err(error) => {
                warn!(provider = name, error = %error, "failed to serialize verdict for caching");
            }
        }
    }

    Ok(live)
}

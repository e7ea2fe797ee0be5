// Error taxonomy for the checker surface.
//
// InvalidArgument and ProviderNotFound are caller mistakes and are never
// retried. ProviderTransport wraps the last underlying failure after the
// retry budget is exhausted, with the provider and URL attached for
// diagnosis. Cache failures are deliberately absent here: reads fail
// open as a miss and writes are logged and dropped (see cache::CacheError).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CheckError {
    /// Malformed call: no providers registered, or an unrecognized
    /// consensus policy string.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A requested provider name is not in the registry.
    #[error("provider \"{0}\" not found")]
    ProviderNotFound(String),

    /// A backend call failed after all retries.
    #[error("provider {provider} failed checking {url}: {reason}")]
    ProviderTransport {
        provider: String,
        url: String,
        reason: anyhow::Error,
    },
}

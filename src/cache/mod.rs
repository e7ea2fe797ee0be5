// Verdict caching — get/set/delete abstraction keyed by (provider, URL).
//
// The Cache trait defines the interface. NullCache is the safe default
// (always misses, always accepts writes) so callers never need a null
// check. MemoryCache is the in-process TTL store.

pub mod memory;
pub mod null;
pub mod traits;

pub use memory::MemoryCache;
pub use null::NullCache;
pub use traits::{Cache, CacheError};

use sha2::{Digest, Sha256};

/// Application prefix namespacing every cache key.
const KEY_PREFIX: &str = "urlwarden";

/// Derive the cache key for one provider's verdict on a normalized URL.
///
/// The URL is content-hashed and namespaced by provider name under the
/// application prefix, so keys from different providers never collide.
/// Deterministic: the same (provider, normalized URL) pair always maps
/// to the same key.
pub fn cache_key(provider_name: &str, normalized_url: &str) -> String {
    let digest = Sha256::digest(normalized_url.as_bytes());
    format!("{KEY_PREFIX}:{provider_name}:{}", hex::encode(digest))
}

// Reputation providers — one adapter per backend, all behind the
// Provider trait.
//
// Adapters are thin reqwest clients: build the vendor request, map the
// payload to normalized threats, and nothing else. Retry, timeout and
// caching are applied by the checker engine, uniformly for every
// provider.

pub mod ipqualityscore;
pub mod phishtank;
pub mod retry;
pub mod safebrowsing;
pub mod traits;
pub mod url;
pub mod virustotal;

pub use ipqualityscore::IpQualityScoreProvider;
pub use phishtank::PhishTankProvider;
pub use retry::execute_with_retry;
pub use safebrowsing::SafeBrowsingProvider;
pub use traits::Provider;
pub use url::normalize_url;
pub use virustotal::VirusTotalProvider;

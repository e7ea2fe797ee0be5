// URL normalization, applied once per check before cache-key derivation
// and backend dispatch — so `example.com` and `http://example.com` hit
// the same cache entry and the same backend semantics.

use std::sync::OnceLock;

use regex_lite::Regex;

fn scheme_pattern() -> &'static Regex {
    static SCHEME: OnceLock<Regex> = OnceLock::new();
    SCHEME.get_or_init(|| {
        Regex::new(r"(?i)^(f|ht)tps?://").expect("scheme pattern is valid")
    })
}

/// Trim surrounding whitespace and default the scheme to `http://` when
/// none of http(s)/ftp(s) is present.
pub fn normalize_url(url: &str) -> String {
    let trimmed = url.trim();
    if scheme_pattern().is_match(trimmed) {
        trimmed.to_string()
    } else {
        format!("http://{trimmed}")
    }
}

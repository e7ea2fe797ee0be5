// Composition tests — verifying that the pure pieces chain together:
//   normalize -> cache key -> (serialized verdict) -> aggregate -> consensus
// without any network calls or async machinery.

use urlwarden::cache::cache_key;
use urlwarden::provider::normalize_url;
use urlwarden::result::{AggregateResult, CheckResult, Consensus, Threat};

fn verdict(url: &str, threat_types: &[&str]) -> CheckResult {
    let mut result = CheckResult::new(url);
    for threat_type in threat_types {
        result.add_threat(
            "composition",
            Threat::new(*threat_type, "ANY_PLATFORM", "flagged"),
        );
    }
    result
}

// ============================================================
// Chain: normalize -> cache key
// ============================================================

#[test]
fn equivalent_url_spellings_produce_one_cache_key() {
    let spellings = ["example.com", " example.com ", "  http://example.com  "];
    let keys: Vec<String> = spellings
        .iter()
        .map(|s| cache_key("phishtank", &normalize_url(s)))
        .collect();

    assert_eq!(keys[0], keys[1]);
    assert_eq!(keys[1], keys[2]);
}

#[test]
fn different_urls_and_providers_produce_distinct_keys() {
    let key_a = cache_key("phishtank", &normalize_url("example.com"));
    let key_b = cache_key("phishtank", &normalize_url("example.org"));
    let key_c = cache_key("virustotal", &normalize_url("example.com"));

    assert_ne!(key_a, key_b);
    assert_ne!(key_a, key_c);
}

// ============================================================
// Chain: serialized verdict -> aggregate -> consensus
// ============================================================

#[test]
fn cached_verdict_reduces_identically_to_the_live_one() {
    let live = verdict("http://bad.example", &["PHISHING"]);

    // The engine caches verdicts as JSON; a reconstructed verdict must
    // drive the consensus exactly like the original
    let json = serde_json::to_string(&live).unwrap();
    let cached: CheckResult = serde_json::from_str(&json).unwrap();
    assert_eq!(cached, live);

    for source in [live, cached] {
        let mut aggregate = AggregateResult::new("http://bad.example");
        aggregate.add_provider_result("phishtank", source);
        assert!(!aggregate.determine_overall_safety(Consensus::Any));
    }
}

#[test]
fn any_consensus_over_mixed_verdicts() {
    // 3 providers: safe, safe, unsafe
    let mut aggregate = AggregateResult::new("http://example.com");
    aggregate.add_provider_result("a", verdict("http://example.com", &[]));
    aggregate.add_provider_result("b", verdict("http://example.com", &[]));
    aggregate.add_provider_result("c", verdict("http://example.com", &["MALWARE"]));

    assert!(!aggregate.determine_overall_safety(Consensus::Any));
}

#[test]
fn all_consensus_over_mixed_verdicts() {
    let mut aggregate = AggregateResult::new("http://example.com");
    aggregate.add_provider_result("a", verdict("http://example.com", &[]));
    aggregate.add_provider_result("b", verdict("http://example.com", &[]));
    aggregate.add_provider_result("c", verdict("http://example.com", &["MALWARE"]));

    assert!(aggregate.determine_overall_safety(Consensus::All));
}

#[test]
fn majority_consensus_tie_reads_safe() {
    // 4 providers, 2 unsafe
    let mut aggregate = AggregateResult::new("http://example.com");
    aggregate.add_provider_result("a", verdict("http://example.com", &["SPAM"]));
    aggregate.add_provider_result("b", verdict("http://example.com", &["PHISHING"]));
    aggregate.add_provider_result("c", verdict("http://example.com", &[]));
    aggregate.add_provider_result("d", verdict("http://example.com", &[]));

    assert!(aggregate.determine_overall_safety(Consensus::Majority));
}

#[test]
fn threat_summary_collects_unique_tags_per_provider() {
    let mut aggregate = AggregateResult::new("http://bad.example");
    aggregate.add_provider_result(
        "a",
        verdict("http://bad.example", &["PHISHING", "MALWARE", "PHISHING"]),
    );
    aggregate.add_provider_result("b", verdict("http://bad.example", &[]));
    aggregate.determine_overall_safety(Consensus::Any);

    assert_eq!(
        aggregate.threat_summary(),
        vec![("a", "PHISHING, MALWARE".to_string())]
    );
    assert_eq!(aggregate.threats().len(), 1);
}

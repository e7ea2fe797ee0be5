// Adapter payload mapping tests — serde deserialization of backend
// responses and their reduction to normalized threats, without any
// network access.

use serde_json::{Map, Value};

use urlwarden::provider::ipqualityscore::{result_from_report, ScanReport};
use urlwarden::provider::phishtank::{result_from_response, CheckUrlResponse};
use urlwarden::provider::safebrowsing::{result_from_matches, FindThreatsResponse};
use urlwarden::provider::virustotal::{result_from_analysis, AnalysisResponse};

// ============================================================
// Google Safe Browsing
// ============================================================

#[test]
fn safebrowsing_empty_response_is_safe() {
    let response: FindThreatsResponse = serde_json::from_str("{}").unwrap();
    assert!(response.matches.is_empty());

    let result = result_from_matches("http://example.com", &response.matches);
    assert!(result.is_safe());
}

#[test]
fn safebrowsing_matches_map_to_threats_with_provider_name() {
    let json = r#"{
        "matches": [
            {
                "threatType": "MALWARE",
                "platformType": "ANY_PLATFORM",
                "threat": {"url": "http://malware.example/payload"},
                "cacheDuration": "300s"
            },
            {
                "threatType": "SOCIAL_ENGINEERING",
                "platformType": "WINDOWS",
                "threat": {"url": "http://malware.example"}
            }
        ]
    }"#;
    let response: FindThreatsResponse = serde_json::from_str(json).unwrap();
    let result = result_from_matches("http://malware.example", &response.matches);

    assert!(!result.is_safe());
    assert_eq!(result.threats().len(), 2);

    let first = &result.threats()[0];
    assert_eq!(first.threat_type, "MALWARE");
    assert_eq!(first.platform, "ANY_PLATFORM");
    assert_eq!(first.description, "This URL contains malware");
    assert_eq!(first.url.as_deref(), Some("http://malware.example/payload"));
    assert_eq!(first.provider_name(), Some("google_safebrowsing"));
    // Unmapped payload fields travel as metadata
    assert_eq!(first.metadata["cacheDuration"], Value::from("300s"));

    let second = &result.threats()[1];
    assert_eq!(second.threat_type, "SOCIAL_ENGINEERING");
    assert_eq!(second.platform, "WINDOWS");
}

#[test]
fn safebrowsing_empty_match_entry_falls_back_to_unknown() {
    let json = r#"{"matches": [{}]}"#;
    let response: FindThreatsResponse = serde_json::from_str(json).unwrap();
    let result = result_from_matches("http://example.com", &response.matches);

    let threat = &result.threats()[0];
    assert_eq!(threat.threat_type, "UNKNOWN");
    assert_eq!(threat.platform, "ANY_PLATFORM");
    assert_eq!(threat.url.as_deref(), Some("http://example.com"));
}

// ============================================================
// PhishTank
// ============================================================

#[test]
fn phishtank_verified_phish_is_flagged() {
    let json = r#"{
        "results": {
            "in_database": true,
            "phish": true,
            "phish_id": 88,
            "verified": true,
            "verified_at": "2024-11-02T10:00:00+00:00",
            "phish_detail_page": "https://phishtank.org/phish_detail.php?phish_id=88"
        }
    }"#;
    let response: CheckUrlResponse = serde_json::from_str(json).unwrap();
    let result = result_from_response("http://phish.example/login", &response.results);

    assert!(!result.is_safe());
    let threat = &result.threats()[0];
    assert_eq!(threat.threat_type, "PHISHING");
    assert_eq!(threat.provider_name(), Some("phishtank"));
    assert_eq!(threat.metadata["phish_id"], Value::from(88));
    assert_eq!(threat.metadata["verified"], Value::from(true));
}

#[test]
fn phishtank_unknown_url_is_safe() {
    let json = r#"{"results": {"in_database": false}}"#;
    let response: CheckUrlResponse = serde_json::from_str(json).unwrap();
    let result = result_from_response("http://example.com", &response.results);
    assert!(result.is_safe());
}

#[test]
fn phishtank_retired_entry_is_not_flagged() {
    // In the database but no longer a live phish
    let json = r#"{
        "results": {
            "in_database": true,
            "phish": false,
            "phish_detail_page": "https://phishtank.org/phish_detail.php?phish_id=12"
        }
    }"#;
    let response: CheckUrlResponse = serde_json::from_str(json).unwrap();
    let result = result_from_response("http://example.com", &response.results);
    assert!(result.is_safe());
}

// ============================================================
// VirusTotal
// ============================================================

#[test]
fn virustotal_engine_detections_are_flagged_with_stats() {
    let json = r#"{
        "data": {
            "attributes": {
                "stats": {"malicious": 3, "suspicious": 1, "harmless": 60, "undetected": 10},
                "last_analysis_date": 1730540000
            }
        }
    }"#;
    let analysis: AnalysisResponse = serde_json::from_str(json).unwrap();
    let result = result_from_analysis("http://bad.example", &analysis);

    assert!(!result.is_safe());
    let threat = &result.threats()[0];
    assert_eq!(threat.threat_type, "MALICIOUS_URL");
    assert_eq!(threat.provider_name(), Some("virustotal"));
    assert!(threat.description.contains("3 malicious"));
    assert!(threat.description.contains("1 suspicious"));
    assert_eq!(threat.metadata["stats"]["malicious"], Value::from(3));
    assert_eq!(threat.metadata["analysis_date"], Value::from(1730540000));
}

#[test]
fn virustotal_clean_analysis_is_safe() {
    let json = r#"{
        "data": {
            "attributes": {
                "stats": {"malicious": 0, "suspicious": 0, "harmless": 70, "undetected": 4}
            }
        }
    }"#;
    let analysis: AnalysisResponse = serde_json::from_str(json).unwrap();
    let result = result_from_analysis("http://example.com", &analysis);
    assert!(result.is_safe());
}

#[test]
fn virustotal_missing_stats_default_to_zero() {
    let json = r#"{"data": {"attributes": {}}}"#;
    let analysis: AnalysisResponse = serde_json::from_str(json).unwrap();
    let result = result_from_analysis("http://example.com", &analysis);
    assert!(result.is_safe());
}

// ============================================================
// IPQualityScore
// ============================================================

fn payload(json: &str) -> Map<String, Value> {
    serde_json::from_str(json).unwrap()
}

#[test]
fn ipqualityscore_phishing_flag_maps_to_phishing() {
    let raw = payload(r#"{"success": true, "phishing": true, "risk_score": 92}"#);
    let report = ScanReport::from_payload(&raw);
    let result = result_from_report("http://phish.example", &report, raw);

    assert!(!result.is_safe());
    let threat = &result.threats()[0];
    assert_eq!(threat.threat_type, "PHISHING");
    assert_eq!(threat.provider_name(), Some("ipqualityscore"));
    // The whole payload rides along as metadata
    assert_eq!(threat.metadata["risk_score"], Value::from(92));
}

#[test]
fn ipqualityscore_malware_outranks_other_flags() {
    let raw = payload(r#"{"success": true, "malware": true, "phishing": true, "spamming": true}"#);
    let report = ScanReport::from_payload(&raw);
    let result = result_from_report("http://bad.example", &report, raw);
    assert_eq!(result.threats()[0].threat_type, "MALWARE");
}

#[test]
fn ipqualityscore_unsafe_flag_alone_maps_to_unsafe() {
    let raw = payload(r#"{"success": true, "unsafe": true}"#);
    let report = ScanReport::from_payload(&raw);
    let result = result_from_report("http://sketchy.example", &report, raw);
    assert_eq!(result.threats()[0].threat_type, "UNSAFE");
}

#[test]
fn ipqualityscore_clean_scan_is_safe() {
    let raw = payload(r#"{"success": true, "risk_score": 3}"#);
    let report = ScanReport::from_payload(&raw);
    assert!(!report.is_flagged());
    let result = result_from_report("http://example.com", &report, raw);
    assert!(result.is_safe());
}

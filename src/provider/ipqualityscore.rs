// IPQualityScore adapter.
//
// Single GET against the URL scanning endpoint. The response carries a
// set of boolean risk flags; the most severe one that is set decides
// the threat tag, and the whole payload travels as metadata.
//
// API docs: https://www.ipqualityscore.com/documentation/malicious-url-scanner-api

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Map, Value};
use tracing::debug;

use super::traits::Provider;
use super::url::normalize_url;
use crate::result::{CheckResult, Threat};

const API_URL: &str = "https://ipqualityscore.com/api/json/url";
const PROVIDER_NAME: &str = "ipqualityscore";

#[derive(Debug)]
pub struct IpQualityScoreProvider {
    client: Client,
    api_key: String,
}

impl IpQualityScoreProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl Provider for IpQualityScoreProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn check(&self, url: &str) -> Result<CheckResult> {
        let normalized = normalize_url(url);
        let encoded: String = url_encode(&normalized);

        let response = self
            .client
            .get(format!("{API_URL}/{}/{encoded}", self.api_key))
            .send()
            .await
            .context("Failed to call IPQualityScore")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("IPQualityScore returned {status}: {body}");
        }

        let scan: Map<String, Value> = response
            .json()
            .await
            .context("Failed to parse IPQualityScore response")?;

        let report = ScanReport::from_payload(&scan);
        if !report.success {
            anyhow::bail!(
                "IPQualityScore API error: {}",
                report.message.as_deref().unwrap_or("Unknown error")
            );
        }

        debug!(
            url = normalized,
            unsafe_flag = report.unsafe_flag,
            "IPQualityScore scan complete"
        );

        Ok(result_from_report(&normalized, &report, scan))
    }
}

/// Map a scan report to a CheckResult; the raw payload becomes the
/// threat metadata. Testable without network access.
pub fn result_from_report(
    normalized_url: &str,
    report: &ScanReport,
    payload: Map<String, Value>,
) -> CheckResult {
    let mut result = CheckResult::new(normalized_url);

    if report.is_flagged() {
        let threat_type = report.threat_type();
        let threat = Threat::new(threat_type, "ANY_PLATFORM", threat_description(threat_type))
            .with_url(normalized_url)
            .with_metadata(payload);
        result.add_threat(PROVIDER_NAME, threat);
    }

    result
}

/// The risk flags of a scan response. Kept alongside the raw payload
/// because the API reports many more fields than the ones that drive
/// the verdict.
#[derive(Debug, Default)]
pub struct ScanReport {
    pub success: bool,
    pub message: Option<String>,
    pub malware: bool,
    pub phishing: bool,
    pub parking: bool,
    pub spamming: bool,
    pub suspicious: bool,
    pub unsafe_flag: bool,
}

impl ScanReport {
    pub fn from_payload(payload: &Map<String, Value>) -> Self {
        let flag = |name: &str| payload.get(name).and_then(Value::as_bool).unwrap_or(false);
        Self {
            success: flag("success"),
            message: payload
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string),
            malware: flag("malware"),
            phishing: flag("phishing"),
            parking: flag("parking"),
            spamming: flag("spamming"),
            suspicious: flag("suspicious"),
            unsafe_flag: flag("unsafe"),
        }
    }

    pub fn is_flagged(&self) -> bool {
        self.malware || self.phishing || self.spamming || self.suspicious || self.unsafe_flag
    }

    /// The most severe flag that is set.
    pub fn threat_type(&self) -> &'static str {
        if self.malware {
            "MALWARE"
        } else if self.phishing {
            "PHISHING"
        } else if self.parking {
            "PARKING_DOMAIN"
        } else if self.spamming {
            "SPAM"
        } else if self.suspicious {
            "SUSPICIOUS"
        } else {
            "UNSAFE"
        }
    }
}

fn threat_description(threat_type: &str) -> &'static str {
    match threat_type {
        "MALWARE" => "This URL contains or distributes malware",
        "PHISHING" => "This URL is a phishing site designed to steal sensitive information",
        "PARKING_DOMAIN" => "This domain is parked and may contain misleading ads",
        "SPAM" => "This URL is associated with spam or unwanted communications",
        "SUSPICIOUS" => "This URL exhibits suspicious characteristics",
        "UNSAFE" => "This URL was identified as unsafe",
        _ => "This URL was flagged as potentially harmful",
    }
}

/// Percent-encode a URL for use as a path segment.
fn url_encode(url: &str) -> String {
    let mut encoded = String::with_capacity(url.len());
    for byte in url.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(byte as char)
            }
            _ => encoded.push_str(&format!("%{byte:02X}")),
        }
    }
    encoded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_encoding_escapes_reserved_characters() {
        assert_eq!(
            url_encode("http://example.com/a b"),
            "http%3A%2F%2Fexample.com%2Fa%20b"
        );
    }

    #[test]
    fn test_threat_type_prefers_the_most_severe_flag() {
        let report = ScanReport {
            success: true,
            malware: true,
            phishing: true,
            ..Default::default()
        };
        assert_eq!(report.threat_type(), "MALWARE");

        let report = ScanReport {
            success: true,
            suspicious: true,
            ..Default::default()
        };
        assert_eq!(report.threat_type(), "SUSPICIOUS");
    }
}

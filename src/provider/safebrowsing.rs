// Google Safe Browsing v4 adapter.
//
// One POST to threatMatches:find per check; every entry in `matches`
// becomes a normalized threat, with the raw match kept as metadata.
//
// API docs: https://developers.google.com/safe-browsing/v4/lookup-api

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use super::traits::Provider;
use super::url::normalize_url;
use crate::result::{CheckResult, Threat};

const API_URL: &str = "https://safebrowsing.googleapis.com/v4/threatMatches:find";
const PROVIDER_NAME: &str = "google_safebrowsing";

#[derive(Debug)]
pub struct SafeBrowsingProvider {
    client: Client,
    api_key: String,
}

impl SafeBrowsingProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl Provider for SafeBrowsingProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn check(&self, url: &str) -> Result<CheckResult> {
        let normalized = normalize_url(url);

        let request = FindThreatsRequest {
            client: ClientInfo {
                client_id: "urlwarden".to_string(),
                client_version: env!("CARGO_PKG_VERSION").to_string(),
            },
            threat_info: ThreatInfo {
                threat_types: vec![
                    "MALWARE",
                    "SOCIAL_ENGINEERING",
                    "UNWANTED_SOFTWARE",
                    "POTENTIALLY_HARMFUL_APPLICATION",
                ],
                platform_types: vec!["ANY_PLATFORM"],
                threat_entry_types: vec!["URL"],
                threat_entries: vec![ThreatEntry {
                    url: normalized.clone(),
                }],
            },
        };

        let response = self
            .client
            .post(format!("{API_URL}?key={}", self.api_key))
            .json(&request)
            .send()
            .await
            .context("Failed to call Google Safe Browsing")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Google Safe Browsing returned {status}: {body}");
        }

        let found: FindThreatsResponse = response
            .json()
            .await
            .context("Failed to parse Google Safe Browsing response")?;

        debug!(
            url = normalized,
            matches = found.matches.len(),
            "Safe Browsing lookup complete"
        );

        Ok(result_from_matches(&normalized, &found.matches))
    }
}

/// Map a `matches` payload to a CheckResult. Split out from the HTTP
/// path so payload mapping is testable without network access.
pub fn result_from_matches(normalized_url: &str, matches: &[ThreatMatch]) -> CheckResult {
    let mut result = CheckResult::new(normalized_url);

    for entry in matches {
        let threat_type = entry.threat_type.as_deref().unwrap_or("UNKNOWN");
        let platform = entry.platform_type.as_deref().unwrap_or("ANY_PLATFORM");
        let threat_url = entry
            .threat
            .as_ref()
            .map(|t| t.url.as_str())
            .unwrap_or(normalized_url);

        let metadata = match serde_json::to_value(entry) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        };

        let threat = Threat::new(threat_type, platform, threat_description(threat_type))
            .with_url(threat_url)
            .with_metadata(metadata);
        result.add_threat(PROVIDER_NAME, threat);
    }

    result
}

fn threat_description(threat_type: &str) -> &'static str {
    match threat_type {
        "MALWARE" => "This URL contains malware",
        "SOCIAL_ENGINEERING" => "This URL contains phishing or social engineering content",
        "UNWANTED_SOFTWARE" => "This URL contains unwanted software",
        "POTENTIALLY_HARMFUL_APPLICATION" => {
            "This URL contains a potentially harmful application"
        }
        _ => "This URL has been identified as unsafe",
    }
}

// --- Safe Browsing request/response types ---

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FindThreatsRequest {
    client: ClientInfo,
    threat_info: ThreatInfo,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ClientInfo {
    client_id: String,
    client_version: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ThreatInfo {
    threat_types: Vec<&'static str>,
    platform_types: Vec<&'static str>,
    threat_entry_types: Vec<&'static str>,
    threat_entries: Vec<ThreatEntry>,
}

#[derive(Serialize)]
struct ThreatEntry {
    url: String,
}

/// Response from `threatMatches:find`. An absent `matches` array means
/// the URL is clean.
#[derive(Debug, Deserialize)]
pub struct FindThreatsResponse {
    #[serde(default)]
    pub matches: Vec<ThreatMatch>,
}

/// A single match entry. Fields beyond the ones we map are retained in
/// `extra` and travel with the threat as metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreatMatch {
    pub threat_type: Option<String>,
    pub platform_type: Option<String>,
    pub threat: Option<ThreatUrl>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreatUrl {
    pub url: String,
}

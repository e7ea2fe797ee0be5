// PhishTank adapter.
//
// Form POST to the checkurl endpoint; the URL is flagged PHISHING only
// when PhishTank has it in the database as a live phish.
//
// API docs: https://phishtank.org/api_info.php

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use super::traits::Provider;
use super::url::normalize_url;
use crate::result::{CheckResult, Threat};

const API_URL: &str = "https://checkurl.phishtank.com/checkurl/";
const PROVIDER_NAME: &str = "phishtank";

#[derive(Debug)]
pub struct PhishTankProvider {
    client: Client,
    api_key: String,
}

impl PhishTankProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl Provider for PhishTankProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn check(&self, url: &str) -> Result<CheckResult> {
        let normalized = normalize_url(url);

        let form = [
            ("url", normalized.as_str()),
            ("api_key", self.api_key.as_str()),
            ("format", "json"),
        ];

        let response = self
            .client
            .post(API_URL)
            .header("User-Agent", "urlwarden/0.1")
            .form(&form)
            .send()
            .await
            .context("Failed to call PhishTank")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("PhishTank returned {status}: {body}");
        }

        let checked: CheckUrlResponse = response
            .json()
            .await
            .context("Failed to parse PhishTank response")?;

        debug!(
            url = normalized,
            in_database = checked.results.in_database,
            "PhishTank lookup complete"
        );

        Ok(result_from_response(&normalized, &checked.results))
    }
}

/// Map a checkurl response to a CheckResult. Testable without network
/// access.
pub fn result_from_response(normalized_url: &str, results: &PhishTankResults) -> CheckResult {
    let mut result = CheckResult::new(normalized_url);

    if results.in_database && results.phish && results.phish_detail_page.is_some() {
        let mut metadata = Map::new();
        if let Some(id) = results.phish_id {
            metadata.insert("phish_id".to_string(), Value::from(id));
        }
        metadata.insert("verified".to_string(), Value::from(results.verified));
        if let Some(at) = &results.verified_at {
            metadata.insert("verified_at".to_string(), Value::from(at.clone()));
        }
        if let Some(page) = &results.phish_detail_page {
            metadata.insert("phish_detail_url".to_string(), Value::from(page.clone()));
        }

        let threat = Threat::new(
            "PHISHING",
            "ANY_PLATFORM",
            "This URL was identified as a phishing site by PhishTank",
        )
        .with_url(normalized_url)
        .with_metadata(metadata);
        result.add_threat(PROVIDER_NAME, threat);
    }

    result
}

// --- PhishTank response types ---

#[derive(Debug, Deserialize)]
pub struct CheckUrlResponse {
    pub results: PhishTankResults,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PhishTankResults {
    pub in_database: bool,
    /// True when the entry is a confirmed phish (false for retired or
    /// disputed entries still in the database).
    pub phish: bool,
    pub phish_id: Option<u64>,
    pub verified: bool,
    pub verified_at: Option<String>,
    pub phish_detail_page: Option<String>,
}

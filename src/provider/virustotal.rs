// VirusTotal v3 adapter.
//
// Two-step flow: submit the URL for analysis, then fetch the analysis
// record. The URL is flagged MALICIOUS_URL when any engine reports it
// malicious or suspicious, with the per-verdict engine counts kept as
// metadata.
//
// API docs: https://docs.virustotal.com/reference/urls

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use super::traits::Provider;
use super::url::normalize_url;
use crate::result::{CheckResult, Threat};

const API_URL: &str = "https://www.virustotal.com/api/v3/urls";
const PROVIDER_NAME: &str = "virustotal";

#[derive(Debug)]
pub struct VirusTotalProvider {
    client: Client,
    api_key: String,
}

impl VirusTotalProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
        }
    }

    async fn submit_url(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .post(API_URL)
            .header("x-apikey", &self.api_key)
            .form(&[("url", url)])
            .send()
            .await
            .context("Failed to submit URL to VirusTotal")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("VirusTotal submit returned {status}: {body}");
        }

        let submitted: SubmitResponse = response
            .json()
            .await
            .context("Failed to parse VirusTotal submit response")?;

        Ok(submitted.data.id)
    }

    async fn fetch_analysis(&self, url_id: &str) -> Result<AnalysisResponse> {
        let response = self
            .client
            .get(format!("{API_URL}/{url_id}"))
            .header("x-apikey", &self.api_key)
            .send()
            .await
            .context("Failed to fetch VirusTotal analysis")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("VirusTotal analysis returned {status}: {body}");
        }

        response
            .json()
            .await
            .context("Failed to parse VirusTotal analysis response")
    }
}

#[async_trait]
impl Provider for VirusTotalProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn check(&self, url: &str) -> Result<CheckResult> {
        let normalized = normalize_url(url);

        let url_id = self.submit_url(&normalized).await?;
        let analysis = self.fetch_analysis(&url_id).await?;

        debug!(
            url = normalized,
            malicious = analysis.data.attributes.stats.malicious,
            suspicious = analysis.data.attributes.stats.suspicious,
            "VirusTotal analysis complete"
        );

        Ok(result_from_analysis(&normalized, &analysis))
    }
}

/// Map an analysis record to a CheckResult. Testable without network
/// access.
pub fn result_from_analysis(normalized_url: &str, analysis: &AnalysisResponse) -> CheckResult {
    let mut result = CheckResult::new(normalized_url);
    let attributes = &analysis.data.attributes;
    let stats = &attributes.stats;

    if stats.malicious > 0 || stats.suspicious > 0 {
        let mut metadata = Map::new();
        if let Ok(stats_value) = serde_json::to_value(stats) {
            metadata.insert("stats".to_string(), stats_value);
        }
        if let Some(date) = attributes.last_analysis_date {
            metadata.insert("analysis_date".to_string(), Value::from(date));
        }

        let description = format!(
            "Flagged by VirusTotal engines: {} malicious, {} suspicious",
            stats.malicious, stats.suspicious
        );

        let threat = Threat::new("MALICIOUS_URL", "ANY_PLATFORM", description)
            .with_url(normalized_url)
            .with_metadata(metadata);
        result.add_threat(PROVIDER_NAME, threat);
    }

    result
}

// --- VirusTotal response types ---

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    data: SubmitData,
}

#[derive(Debug, Deserialize)]
struct SubmitData {
    id: String,
}

#[derive(Debug, Deserialize)]
pub struct AnalysisResponse {
    pub data: AnalysisData,
}

#[derive(Debug, Deserialize)]
pub struct AnalysisData {
    pub attributes: AnalysisAttributes,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AnalysisAttributes {
    pub stats: AnalysisStats,
    pub last_analysis_date: Option<i64>,
}

/// Per-verdict engine counts from an analysis.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisStats {
    pub malicious: u32,
    pub suspicious: u32,
    pub harmless: u32,
    pub undetected: u32,
}

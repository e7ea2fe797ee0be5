// Combined verdict across providers, reduced by a consensus policy.
//
// The reduction counts unsafe verdicts: a provider is "unsafe" when its
// CheckResult carries at least one threat. Providers that failed after
// retries are excluded from the reduction entirely and recorded as
// failures instead — a failed check never silently becomes safe.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::check::CheckResult;
use super::threat::Threat;
use crate::error::CheckError;

/// The rule used to reduce multiple provider verdicts to one decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Consensus {
    /// Unsafe if any provider flags the URL (strictest).
    #[default]
    Any,
    /// Unsafe only if every provider flags the URL (most lenient).
    All,
    /// Unsafe if more than half of the providers flag the URL
    /// (ties favor safe).
    Majority,
}

impl Consensus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Consensus::Any => "any",
            Consensus::All => "all",
            Consensus::Majority => "majority",
        }
    }
}

impl fmt::Display for Consensus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Consensus {
    type Err = CheckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "any" => Ok(Consensus::Any),
            "all" => Ok(Consensus::All),
            "majority" => Ok(Consensus::Majority),
            other => Err(CheckError::InvalidArgument(format!(
                "invalid consensus \"{other}\", valid values are: any, all, majority"
            ))),
        }
    }
}

/// A provider whose check failed after retries were exhausted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderFailure {
    pub provider: String,
    pub error: String,
}

/// The final verdict for one URL across all queried providers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregateResult {
    url: String,
    is_safe: bool,
    /// Provider name → verdict, in provider iteration order.
    provider_results: Vec<(String, CheckResult)>,
    failures: Vec<ProviderFailure>,
}

impl AggregateResult {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            is_safe: true,
            provider_results: Vec::new(),
            failures: Vec::new(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Record a provider's verdict. Re-adding a provider name replaces
    /// its earlier verdict in place.
    pub fn add_provider_result(&mut self, provider_name: &str, result: CheckResult) -> &mut Self {
        match self
            .provider_results
            .iter_mut()
            .find(|(name, _)| name == provider_name)
        {
            Some((_, existing)) => *existing = result,
            None => self
                .provider_results
                .push((provider_name.to_string(), result)),
        }
        self
    }

    /// Record a provider whose check failed after retries.
    pub fn add_failure(&mut self, provider_name: &str, error: impl fmt::Display) -> &mut Self {
        self.failures.push(ProviderFailure {
            provider: provider_name.to_string(),
            error: error.to_string(),
        });
        self
    }

    pub fn provider_results(&self) -> impl Iterator<Item = (&str, &CheckResult)> {
        self.provider_results
            .iter()
            .map(|(name, result)| (name.as_str(), result))
    }

    pub fn provider_result(&self, provider_name: &str) -> Option<&CheckResult> {
        self.provider_results
            .iter()
            .find(|(name, _)| name == provider_name)
            .map(|(_, result)| result)
    }

    pub fn failures(&self) -> &[ProviderFailure] {
        &self.failures
    }

    /// False when every resolved provider failed: the aggregate then
    /// carries no verdicts and `is_safe()` is vacuously true, so callers
    /// that must not fail open should branch on this first.
    pub fn is_conclusive(&self) -> bool {
        !self.provider_results.is_empty() || self.failures.is_empty()
    }

    /// Reduce the collected verdicts to the final safety decision.
    ///
    /// With zero verdicts the result is safe: a check against zero
    /// providers makes no safety claim and must not be reported as
    /// unsafe by default. Otherwise the unsafe count decides per the
    /// consensus policy. Pure and order-independent over the verdict
    /// set; called exactly once, at the end of a check.
    pub fn determine_overall_safety(&mut self, consensus: Consensus) -> bool {
        if self.provider_results.is_empty() {
            self.is_safe = true;
            return self.is_safe;
        }

        let total = self.provider_results.len();
        let unsafe_count = self
            .provider_results
            .iter()
            .filter(|(_, result)| !result.is_safe())
            .count();

        self.is_safe = match consensus {
            Consensus::Any => unsafe_count == 0,
            Consensus::All => unsafe_count < total,
            Consensus::Majority => unsafe_count <= total / 2,
        };

        self.is_safe
    }

    pub fn is_safe(&self) -> bool {
        self.is_safe
    }

    /// Threats reported by each unsafe provider.
    pub fn threats(&self) -> Vec<(&str, &[Threat])> {
        self.provider_results
            .iter()
            .filter(|(_, result)| !result.is_safe())
            .map(|(name, result)| (name.as_str(), result.threats()))
            .collect()
    }

    /// Per-provider summary of unique threat tags, e.g.
    /// `[("phishtank", "PHISHING")]`.
    pub fn threat_summary(&self) -> Vec<(&str, String)> {
        self.provider_results
            .iter()
            .filter(|(_, result)| !result.is_safe())
            .map(|(name, result)| (name.as_str(), result.threat_types().join(", ")))
            .collect()
    }
}

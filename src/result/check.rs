// One provider's verdict for one URL.

use serde::{Deserialize, Serialize};

use super::threat::Threat;

/// A single provider's check outcome: the queried URL plus zero or more
/// threats. Safe ⇔ no threats. Serializes losslessly so cached verdicts
/// reconstruct equal in content to the live ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    url: String,
    threats: Vec<Threat>,
}

impl CheckResult {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            threats: Vec::new(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Attach a threat, stamping it with the reporting provider's name.
    /// The provider name is set here, exactly once — adapters never set
    /// it themselves.
    pub fn add_threat(&mut self, provider_name: &str, mut threat: Threat) -> &mut Self {
        threat.set_provider_name(provider_name);
        self.threats.push(threat);
        self
    }

    pub fn threats(&self) -> &[Threat] {
        &self.threats
    }

    pub fn is_safe(&self) -> bool {
        self.threats.is_empty()
    }

    /// Unique threat category tags, in first-seen order.
    pub fn threat_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = Vec::new();
        for threat in &self.threats {
            if !types.contains(&threat.threat_type.as_str()) {
                types.push(&threat.threat_type);
            }
        }
        types
    }

    /// The first threat's category tag, or `None` for a safe result.
    pub fn threat_type(&self) -> Option<&str> {
        self.threats.first().map(|t| t.threat_type.as_str())
    }

    pub fn has_threat_type(&self, threat_type: &str) -> bool {
        self.threats.iter().any(|t| t.threat_type == threat_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_result_is_safe() {
        let result = CheckResult::new("http://example.com");
        assert!(result.is_safe());
        assert!(result.threat_type().is_none());
    }

    #[test]
    fn test_add_threat_stamps_provider_name() {
        let mut result = CheckResult::new("http://bad.example");
        result.add_threat(
            "google_safebrowsing",
            Threat::new("MALWARE", "ANY_PLATFORM", "This URL contains malware"),
        );

        assert!(!result.is_safe());
        assert_eq!(
            result.threats()[0].provider_name(),
            Some("google_safebrowsing")
        );
    }

    #[test]
    fn test_threat_types_deduplicates_preserving_order() {
        let mut result = CheckResult::new("http://bad.example");
        result.add_threat("p", Threat::new("PHISHING", "ANY_PLATFORM", "a"));
        result.add_threat("p", Threat::new("MALWARE", "ANY_PLATFORM", "b"));
        result.add_threat("p", Threat::new("PHISHING", "ANY_PLATFORM", "c"));

        assert_eq!(result.threat_types(), vec!["PHISHING", "MALWARE"]);
        assert_eq!(result.threat_type(), Some("PHISHING"));
        assert!(result.has_threat_type("MALWARE"));
        assert!(!result.has_threat_type("SPAM"));
    }

    #[test]
    fn test_serde_round_trip_preserves_content() {
        let mut result = CheckResult::new("http://bad.example");
        result.add_threat(
            "phishtank",
            Threat::new("PHISHING", "ANY_PLATFORM", "Verified phish")
                .with_url("http://bad.example/login"),
        );

        let json = serde_json::to_string(&result).unwrap();
        let restored: CheckResult = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, result);
    }
}

// A single normalized finding reported by a reputation backend.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One threat detected for a URL.
///
/// The category tag is an open set: the common core is MALWARE, PHISHING,
/// SUSPICIOUS, SPAM and UNKNOWN, but vendors report their own tags
/// (e.g. MALICIOUS_URL, SOCIAL_ENGINEERING) and those pass through
/// verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Threat {
    /// Category tag, e.g. "MALWARE" or "PHISHING"
    pub threat_type: String,
    /// Scope tag, e.g. "ANY_PLATFORM" or a named platform
    pub platform: String,
    /// Human-readable description from the adapter
    pub description: String,
    /// The threat target, which may differ from the queried URL
    /// (e.g. a redirect destination)
    pub url: Option<String>,
    /// Opaque key-value bag from the backend response
    #[serde(default)]
    pub metadata: Map<String, Value>,
    /// Set exactly once when the threat is attached to a CheckResult —
    /// never by the provider itself.
    provider_name: Option<String>,
}

impl Threat {
    pub fn new(
        threat_type: impl Into<String>,
        platform: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            threat_type: threat_type.into(),
            platform: platform.into(),
            description: description.into(),
            url: None,
            metadata: Map::new(),
            provider_name: None,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_metadata(mut self, metadata: Map<String, Value>) -> Self {
        self.metadata = metadata;
        self
    }

    /// The provider that reported this threat. `None` only before the
    /// threat has been attached to a CheckResult.
    pub fn provider_name(&self) -> Option<&str> {
        self.provider_name.as_deref()
    }

    pub(crate) fn set_provider_name(&mut self, provider_name: &str) {
        self.provider_name = Some(provider_name.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_name_unset_at_creation() {
        let threat = Threat::new("MALWARE", "ANY_PLATFORM", "This URL contains malware");
        assert!(threat.provider_name().is_none());
    }

    #[test]
    fn test_builder_attaches_url_and_metadata() {
        let mut metadata = Map::new();
        metadata.insert("phish_id".to_string(), Value::from(12345));

        let threat = Threat::new("PHISHING", "ANY_PLATFORM", "Verified phishing site")
            .with_url("http://phish.example/login")
            .with_metadata(metadata);

        assert_eq!(threat.url.as_deref(), Some("http://phish.example/login"));
        assert_eq!(threat.metadata["phish_id"], Value::from(12345));
    }
}

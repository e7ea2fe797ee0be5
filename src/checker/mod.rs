// The checker facade — provider registry, input validation, and the
// public check entry points.
//
// The registry is an ordered, name-keyed map with upsert semantics:
// re-registering a name replaces the provider and keeps its position.
// Registration takes `&mut self` and checks take `&self`, so a check
// can never observe a half-updated registry.

mod engine;

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::config::CheckerConfig;
use crate::error::CheckError;
use crate::provider::{normalize_url, Provider};
use crate::result::{AggregateResult, CheckResult, Consensus};

pub struct UrlChecker {
    providers: Vec<(String, Arc<dyn Provider>)>,
    config: CheckerConfig,
}

impl Default for UrlChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl UrlChecker {
    pub fn new() -> Self {
        Self::with_config(CheckerConfig::default())
    }

    pub fn with_config(config: CheckerConfig) -> Self {
        Self {
            providers: Vec::new(),
            config,
        }
    }

    pub fn config(&self) -> &CheckerConfig {
        &self.config
    }

    /// Register a provider under its own name. Re-registering a name is
    /// an upsert: the new instance replaces the old one in place.
    pub fn add_provider(&mut self, provider: Arc<dyn Provider>) -> &mut Self {
        let name = provider.name().to_string();
        match self.providers.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = provider,
            None => self.providers.push((name, provider)),
        }
        self
    }

    /// Remove a provider by name. Unknown names are a no-op.
    pub fn remove_provider(&mut self, provider_name: &str) -> &mut Self {
        self.providers.retain(|(name, _)| name != provider_name);
        self
    }

    pub fn get_provider(&self, provider_name: &str) -> Result<&Arc<dyn Provider>, CheckError> {
        self.providers
            .iter()
            .find(|(name, _)| name == provider_name)
            .map(|(_, provider)| provider)
            .ok_or_else(|| CheckError::ProviderNotFound(provider_name.to_string()))
    }

    /// Registered provider names, in registration order.
    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Check a URL against the selected providers (the whole registry
    /// when `provider_names` is `None` or empty) and reduce the
    /// verdicts under `consensus`.
    ///
    /// Validation errors surface immediately; per-provider transport
    /// failures do not — they are recorded on the aggregate's
    /// `failures()` so one vendor being down degrades the verdict
    /// instead of aborting it.
    pub async fn check(
        &self,
        url: &str,
        provider_names: Option<&[String]>,
        consensus: Consensus,
    ) -> Result<AggregateResult, CheckError> {
        let resolved = self.resolve_providers(provider_names)?;
        Ok(engine::check_url(&resolved, &self.config, url, consensus).await)
    }

    /// Check a URL with a single named provider, surfacing its
    /// transport failure directly instead of recording it.
    pub async fn check_with(
        &self,
        provider_name: &str,
        url: &str,
    ) -> Result<CheckResult, CheckError> {
        let provider = self.get_provider(provider_name)?;
        let normalized = normalize_url(url);
        engine::check_with_provider(provider_name, provider.as_ref(), &self.config, &normalized)
            .await
    }

    /// Check a batch of URLs, each producing its own aggregate, in
    /// caller order. URLs are processed concurrently under the
    /// configured bound; one URL's provider failures never prevent the
    /// others from completing.
    pub async fn check_batch(
        &self,
        urls: &[String],
        provider_names: Option<&[String]>,
        consensus: Consensus,
    ) -> Result<Vec<(String, AggregateResult)>, CheckError> {
        use futures::stream::{self, StreamExt};

        let resolved = self.resolve_providers(provider_names)?;
        let resolved = &resolved;

        let results = stream::iter(urls.iter().map(|url| async move {
            (
                url.clone(),
                engine::check_url(resolved, &self.config, url, consensus).await,
            )
        }))
        .buffered(self.config.concurrency())
        .collect()
        .await;

        Ok(results)
    }

    /// Dispatch a check as its own task and return the handle.
    ///
    /// Aborting the handle cancels pending provider calls but never
    /// un-caches a verdict a concurrent task already wrote — cache
    /// writes happen inside the provider path before results are
    /// returned.
    pub fn spawn_check(
        self: Arc<Self>,
        url: impl Into<String>,
        provider_names: Option<Vec<String>>,
        consensus: Consensus,
    ) -> JoinHandle<Result<AggregateResult, CheckError>> {
        let checker = self;
        let url = url.into();
        tokio::spawn(async move {
            checker
                .check(&url, provider_names.as_deref(), consensus)
                .await
        })
    }

    /// Validate and resolve the provider subset for a check.
    fn resolve_providers(
        &self,
        provider_names: Option<&[String]>,
    ) -> Result<Vec<(String, Arc<dyn Provider>)>, CheckError> {
        if self.providers.is_empty() {
            return Err(CheckError::InvalidArgument(
                "no providers have been added to the checker".to_string(),
            ));
        }

        let requested = match provider_names {
            None | Some([]) => return Ok(self.providers.clone()),
            Some(names) => names,
        };

        let mut resolved: Vec<(String, Arc<dyn Provider>)> = Vec::with_capacity(requested.len());
        for name in requested {
            let provider = self.get_provider(name)?;
            // A name listed twice still resolves to one check
            if !resolved.iter().any(|(n, _)| n == name) {
                resolved.push((name.clone(), Arc::clone(provider)));
            }
        }

        Ok(resolved)
    }
}

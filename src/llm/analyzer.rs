//! Fallback orchestration across analyst providers.
//!
//! Providers are tried strictly in priority order; the first usable result
//! wins. Exhausting every provider degrades to the canned demonstration
//! analysis rather than surfacing an error, and the attempt trail records
//! what went wrong with each provider.

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::report::{self, PolicyAnalysis};

use super::{create_providers, AnalysisRequest, PolicyProvider, ProviderAttempt, ProviderError};

/// Orchestrates the provider fallback chain.
pub struct PolicyAnalyzer {
    providers: Vec<Box<dyn PolicyProvider>>,
}

impl PolicyAnalyzer {
    /// Build the analyzer with the standard chain: OpenRouter, then Gemini,
    /// then Bytez.
    pub fn new(config: &Config) -> Result<Self, ProviderError> {
        Ok(Self {
            providers: create_providers(config)?,
        })
    }

    /// Build the analyzer over a custom provider chain.
    pub fn with_providers(providers: Vec<Box<dyn PolicyProvider>>) -> Self {
        Self { providers }
    }

    /// Analyze policy text.
    ///
    /// Never fails for valid input: when every provider is skipped or
    /// errors out, the static demonstration analysis is returned tagged
    /// `mock`. The diagnostic trail of attempted providers rides along on
    /// the result.
    pub async fn analyze(&self, text: &str) -> PolicyAnalysis {
        let request = AnalysisRequest::new(text);
        let mut attempts = Vec::new();

        for provider in &self.providers {
            let kind = provider.kind();
            match provider.analyze(&request).await {
                Ok(result) => {
                    info!(provider = %kind, "analysis succeeded");
                    let mut analysis = report::normalize(result);
                    analysis.provider_attempts = attempts;
                    return analysis;
                }
                Err(ProviderError::NotConfigured) => {
                    debug!(provider = %kind, "provider not configured, skipping");
                    attempts.push(ProviderAttempt {
                        provider: kind,
                        error: ProviderError::NotConfigured.to_string(),
                    });
                }
                Err(err) => {
                    warn!(provider = %kind, error = %err, "provider failed, falling back");
                    attempts.push(ProviderAttempt {
                        provider: kind,
                        error: err.to_string(),
                    });
                }
            }
        }

        warn!("all providers exhausted, returning demonstration analysis");
        let mut analysis = report::demo_analysis();
        analysis.provider_attempts = attempts;
        analysis
    }
}

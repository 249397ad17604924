//! Multi-provider analysis pipeline: adapters, payload cleanup, fallback
//! orchestration.

pub mod analyzer;
pub mod payload;
pub mod prompt;
pub mod providers;

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::config::Config;

/// External analyst backends, in fallback priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    OpenRouter,
    Gemini,
    Bytez,
}

impl ProviderKind {
    pub fn mode(self) -> ProcessingMode {
        match self {
            Self::OpenRouter => ProcessingMode::OpenRouter,
            Self::Gemini => ProcessingMode::Gemini,
            Self::Bytez => ProcessingMode::Bytez,
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::OpenRouter => "openrouter",
            Self::Gemini => "gemini",
            Self::Bytez => "bytez",
        })
    }
}

/// Provenance tag on every analysis returned to a caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingMode {
    OpenRouter,
    Gemini,
    Bytez,
    /// Static fallback analysis after every provider failed
    Mock,
    /// Caller explicitly asked for demonstration data
    Demo,
}

impl ProcessingMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OpenRouter => "openrouter",
            Self::Gemini => "gemini",
            Self::Bytez => "bytez",
            Self::Mock => "mock",
            Self::Demo => "demo",
        }
    }
}

impl fmt::Display for ProcessingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One analysis request, immutable once constructed
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    text: String,
    text_length: usize,
}

impl AnalysisRequest {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let text_length = text.chars().count();
        Self { text, text_length }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn text_length(&self) -> usize {
        self.text_length
    }

    /// Whether the document exceeds a provider's large-document threshold
    pub fn is_large(&self, threshold: usize) -> bool {
        self.text_length > threshold
    }
}

/// Parsed-but-unvalidated JSON an adapter extracted from a provider
/// response, tagged with its provenance
#[derive(Debug, Clone)]
pub struct ProviderResult {
    pub payload: Value,
    pub mode: ProcessingMode,
}

/// One entry in the diagnostic trail of attempted providers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderAttempt {
    pub provider: ProviderKind,
    pub error: String,
}

/// Everything that makes one provider unable to produce a usable result.
///
/// None of these are fatal to the overall request; the orchestrator absorbs
/// them and moves to the next provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("provider credentials not configured")]
    NotConfigured,

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("provider returned status {status}")]
    Status { status: u16 },

    #[error("provider rate limited")]
    RateLimited,

    #[error("response envelope missing expected fields")]
    EmptyResponse,

    #[error("no JSON object found in payload")]
    MissingJson,

    #[error("payload is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// Trait for analyst providers
#[async_trait]
pub trait PolicyProvider: Send + Sync {
    /// Analyze policy text, returning the provider's parsed JSON payload
    async fn analyze(&self, request: &AnalysisRequest) -> Result<ProviderResult, ProviderError>;

    fn kind(&self) -> ProviderKind;

    /// Whether this provider has a credential and can be attempted
    fn is_configured(&self) -> bool;
}

/// Build the provider chain in fallback priority order
pub fn create_providers(config: &Config) -> Result<Vec<Box<dyn PolicyProvider>>, ProviderError> {
    Ok(vec![
        Box::new(providers::OpenRouterProvider::new(
            config.providers.openrouter.clone(),
        )?),
        Box::new(providers::GeminiProvider::new(
            config.providers.gemini.clone(),
        )?),
        Box::new(providers::BytezProvider::new(config.providers.bytez.clone())?),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_request_length() {
        let request = AnalysisRequest::new("₹5,00,000 sum insured");
        assert_eq!(request.text_length(), 21);
        assert!(!request.is_large(21));
        assert!(request.is_large(20));
    }

    #[test]
    fn test_processing_mode_serializes_lowercase() {
        let modes = [
            (ProcessingMode::OpenRouter, "\"openrouter\""),
            (ProcessingMode::Gemini, "\"gemini\""),
            (ProcessingMode::Bytez, "\"bytez\""),
            (ProcessingMode::Mock, "\"mock\""),
            (ProcessingMode::Demo, "\"demo\""),
        ];
        for (mode, expected) in modes {
            assert_eq!(serde_json::to_string(&mode).unwrap(), expected);
        }
    }

    #[test]
    fn test_provider_kind_maps_to_mode() {
        assert_eq!(ProviderKind::OpenRouter.mode(), ProcessingMode::OpenRouter);
        assert_eq!(ProviderKind::Gemini.mode(), ProcessingMode::Gemini);
        assert_eq!(ProviderKind::Bytez.mode(), ProcessingMode::Bytez);
    }

    #[test]
    fn test_provider_error_display() {
        assert_eq!(
            ProviderError::NotConfigured.to_string(),
            "provider credentials not configured"
        );
        assert_eq!(
            ProviderError::Status { status: 503 }.to_string(),
            "provider returned status 503"
        );
    }
}

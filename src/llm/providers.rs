//! Provider adapter implementations.
//!
//! Each adapter owns its provider's request shape, authentication scheme,
//! and response envelope. Nothing provider-specific leaks past this module.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::ProviderSettings;
use crate::preprocess::{extract_important_sections, truncate_chars};

use super::payload::extract_json_payload;
use super::prompt::{ANALYST_PROMPT, COMPACT_ANALYST_ROLE};
use super::{AnalysisRequest, PolicyProvider, ProviderError, ProviderKind, ProviderResult};

/// Pause between candidate models after a rate-limit response
const ROTATION_PAUSE: Duration = Duration::from_secs(1);

/// Chat message for provider communication
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// Apply smart extraction for large documents, then the provider's hard
/// character ceiling.
fn prepare_text(request: &AnalysisRequest, settings: &ProviderSettings) -> String {
    let text = if request.is_large(settings.large_doc_threshold) {
        debug!(
            chars = request.text_length(),
            threshold = settings.large_doc_threshold,
            "large document, using smart extraction"
        );
        extract_important_sections(request.text(), settings.extract_budget)
    } else {
        request.text().to_string()
    };

    truncate_chars(&text, settings.submit_ceiling)
}

/// OpenRouter adapter: chat-completion payload, bearer auth, and rotation
/// through an ordered list of free candidate models.
pub struct OpenRouterProvider {
    settings: ProviderSettings,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct OpenRouterRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct OpenRouterResponse {
    #[serde(default)]
    choices: Vec<OpenRouterChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenRouterChoice {
    message: OpenRouterMessage,
}

#[derive(Debug, Deserialize)]
struct OpenRouterMessage {
    content: String,
}

impl OpenRouterProvider {
    pub fn new(settings: ProviderSettings) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()?;

        Ok(Self { settings, client })
    }

    async fn call_model(
        &self,
        api_key: &str,
        model: &str,
        text: &str,
    ) -> Result<ProviderResult, ProviderError> {
        let request = OpenRouterRequest {
            model: model.to_string(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: ANALYST_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: format!("Analyze this insurance policy:\n\n{}", text),
                },
            ],
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
        };

        debug!(model = %model, "sending request to OpenRouter");

        let response = self
            .client
            .post(&self.settings.endpoint)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("HTTP-Referer", "http://localhost:3000")
            .header("X-Title", "InsureScan - Insurance Policy Analyzer")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::RateLimited);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), body = %truncate_chars(&body, 500), "OpenRouter API error");
            return Err(ProviderError::Status {
                status: status.as_u16(),
            });
        }

        let envelope: OpenRouterResponse = response.json().await?;
        let content = envelope
            .choices
            .first()
            .map(|choice| choice.message.content.clone())
            .ok_or(ProviderError::EmptyResponse)?;

        Ok(ProviderResult {
            payload: extract_json_payload(&content)?,
            mode: self.kind().mode(),
        })
    }
}

#[async_trait]
impl PolicyProvider for OpenRouterProvider {
    async fn analyze(&self, request: &AnalysisRequest) -> Result<ProviderResult, ProviderError> {
        let api_key = self
            .settings
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or(ProviderError::NotConfigured)?;

        let text = prepare_text(request, &self.settings);
        debug!(chars = text.chars().count(), "submitting to OpenRouter");

        let mut last_error = None;
        let model_count = self.settings.models.len();

        for (attempt, model) in self.settings.models.iter().enumerate() {
            match self.call_model(api_key, model, &text).await {
                Ok(result) => return Ok(result),
                Err(ProviderError::RateLimited) => {
                    warn!(model = %model, "rate limited, rotating to next candidate model");
                    last_error = Some(ProviderError::RateLimited);
                    if attempt + 1 < model_count {
                        tokio::time::sleep(ROTATION_PAUSE).await;
                    }
                }
                Err(err) => {
                    warn!(model = %model, error = %err, "candidate model failed");
                    last_error = Some(err);
                }
            }
        }

        Err(last_error.unwrap_or(ProviderError::NotConfigured))
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::OpenRouter
    }

    fn is_configured(&self) -> bool {
        self.settings.is_configured()
    }
}

/// Google Gemini adapter: single-prompt content parts, key passed as a
/// query parameter.
pub struct GeminiProvider {
    settings: ProviderSettings,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(rename = "generationConfig")]
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Serialize)]
struct GeminiGenerationConfig {
    temperature: f32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiContent,
}

impl GeminiProvider {
    pub fn new(settings: ProviderSettings) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()?;

        Ok(Self { settings, client })
    }
}

#[async_trait]
impl PolicyProvider for GeminiProvider {
    async fn analyze(&self, request: &AnalysisRequest) -> Result<ProviderResult, ProviderError> {
        let api_key = self
            .settings
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or(ProviderError::NotConfigured)?;
        let model = self
            .settings
            .models
            .first()
            .ok_or(ProviderError::NotConfigured)?;

        let text = prepare_text(request, &self.settings);
        debug!(chars = text.chars().count(), "submitting to Gemini");

        let body = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: format!(
                        "{}\n\nHere is the insurance policy document to analyze:\n\n{}",
                        ANALYST_PROMPT, text
                    ),
                }],
            }],
            generation_config: GeminiGenerationConfig {
                temperature: self.settings.temperature,
                max_output_tokens: self.settings.max_tokens,
            },
        };

        let url = format!(
            "{}?key={}",
            self.settings.endpoint.replace("{model}", model),
            api_key
        );

        let response = self.client.post(&url).json(&body).send().await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::RateLimited);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), body = %truncate_chars(&body, 500), "Gemini API error");
            return Err(ProviderError::Status {
                status: status.as_u16(),
            });
        }

        let envelope: GeminiResponse = response.json().await?;
        let content = envelope
            .candidates
            .first()
            .and_then(|candidate| candidate.content.parts.first())
            .map(|part| part.text.clone())
            .ok_or(ProviderError::EmptyResponse)?;

        Ok(ProviderResult {
            payload: extract_json_payload(&content)?,
            mode: self.kind().mode(),
        })
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Gemini
    }

    fn is_configured(&self) -> bool {
        self.settings.is_configured()
    }
}

/// Bytez adapter: messages payload with a `params` block, bearer auth, and
/// a compact system role since its models choke on very long system prompts.
pub struct BytezProvider {
    settings: ProviderSettings,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct BytezRequest {
    messages: Vec<ChatMessage>,
    stream: bool,
    params: BytezParams,
}

#[derive(Debug, Serialize)]
struct BytezParams {
    max_length: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct BytezResponse {
    output: Option<BytezOutput>,
}

#[derive(Debug, Deserialize)]
struct BytezOutput {
    #[serde(default)]
    content: String,
}

impl BytezProvider {
    pub fn new(settings: ProviderSettings) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()?;

        Ok(Self { settings, client })
    }
}

#[async_trait]
impl PolicyProvider for BytezProvider {
    async fn analyze(&self, request: &AnalysisRequest) -> Result<ProviderResult, ProviderError> {
        let api_key = self
            .settings
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or(ProviderError::NotConfigured)?;
        let model = self
            .settings
            .models
            .first()
            .ok_or(ProviderError::NotConfigured)?;

        let text = prepare_text(request, &self.settings);
        debug!(chars = text.chars().count(), "submitting to Bytez");

        let body = BytezRequest {
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: COMPACT_ANALYST_ROLE.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: format!("{}\n\nAnalyze this policy content:\n{}", ANALYST_PROMPT, text),
                },
            ],
            stream: false,
            params: BytezParams {
                max_length: self.settings.max_tokens,
                temperature: self.settings.temperature,
            },
        };

        let url = self.settings.endpoint.replace("{model}", model);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", api_key))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::RateLimited);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), body = %truncate_chars(&body, 500), "Bytez API error");
            return Err(ProviderError::Status {
                status: status.as_u16(),
            });
        }

        let envelope: BytezResponse = response.json().await?;
        let content = envelope
            .output
            .map(|output| output.content)
            .filter(|content| !content.is_empty())
            .ok_or(ProviderError::EmptyResponse)?;

        Ok(ProviderResult {
            payload: extract_json_payload(&content)?,
            mode: self.kind().mode(),
        })
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Bytez
    }

    fn is_configured(&self) -> bool {
        self.settings.is_configured()
    }
}

//! API data models

use serde::{Deserialize, Serialize};

/// Body of an analysis request: extracted policy text
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub text: Option<String>,

    /// Skip analysis entirely and return demonstration data
    #[serde(default)]
    pub demo_mode: bool,
}

/// Caller-facing error body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            hint: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

//! API request handlers

use serde_json::Value;

use crate::config::Config;
use crate::llm::analyzer::PolicyAnalyzer;
use crate::llm::ProcessingMode;
use crate::report::{self, PolicyAnalysis};

use super::models::{AnalyzeRequest, ErrorResponse};

/// Handle health check requests
pub async fn health_check() -> Value {
    serde_json::json!({
        "status": "healthy",
        "service": "insurescan-rust",
        "version": env!("CARGO_PKG_VERSION"),
        "ai_providers": ["OpenRouter (free)", "Google Gemini", "Bytez (Qwen)", "Mock fallback"],
        "timestamp": chrono::Utc::now().to_rfc3339()
    })
}

/// Handle analysis requests.
///
/// Rejecting missing or too-short text is the only error this surface
/// returns; once input passes, the orchestrator always produces an
/// analysis.
pub async fn analyze(
    analyzer: &PolicyAnalyzer,
    config: &Config,
    request: AnalyzeRequest,
) -> Result<PolicyAnalysis, ErrorResponse> {
    if request.demo_mode {
        let mut analysis = report::demo_analysis();
        analysis.processing_mode = ProcessingMode::Demo;
        return Ok(analysis);
    }

    let text = request.text.unwrap_or_default();
    let text_length = text.chars().count();

    if text_length < config.analysis.min_text_length {
        return Err(ErrorResponse::new(
            "Could not find sufficient text to analyze. Please supply the extracted \
             document text.",
        )
        .with_hint(
            "For images, ensure the text is clear and not blurry. For PDFs, ensure they are \
             not scanned images without OCR.",
        ));
    }

    let mut analysis = analyzer.analyze(&text).await;
    analysis.text_length = Some(text_length);
    Ok(analysis)
}

/// Handle demo requests: the demonstration analysis without any upload
pub async fn demo() -> PolicyAnalysis {
    report::demo_analysis()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigBuilder;

    fn analyzer_and_config() -> (PolicyAnalyzer, Config) {
        let config = ConfigBuilder::new().build();
        let analyzer = PolicyAnalyzer::new(&config).unwrap();
        (analyzer, config)
    }

    #[tokio::test]
    async fn test_analyze_rejects_short_text() {
        let (analyzer, config) = analyzer_and_config();
        let request = AnalyzeRequest {
            text: Some("too short".to_string()),
            demo_mode: false,
        };

        let err = analyze(&analyzer, &config, request).await.unwrap_err();
        assert!(err.error.contains("sufficient text"));
        assert!(err.hint.is_some());
    }

    #[tokio::test]
    async fn test_analyze_rejects_missing_text() {
        let (analyzer, config) = analyzer_and_config();
        let request = AnalyzeRequest {
            text: None,
            demo_mode: false,
        };

        assert!(analyze(&analyzer, &config, request).await.is_err());
    }

    #[tokio::test]
    async fn test_demo_mode_short_circuits_with_demo_tag() {
        let (analyzer, config) = analyzer_and_config();
        let request = AnalyzeRequest {
            text: None,
            demo_mode: true,
        };

        let analysis = analyze(&analyzer, &config, request).await.unwrap();
        assert_eq!(analysis.processing_mode, ProcessingMode::Demo);
    }

    #[tokio::test]
    async fn test_analyze_attaches_text_length() {
        let (analyzer, config) = analyzer_and_config();
        let text = "policy wording that is long enough to be analyzed by the pipeline".to_string();
        let expected_length = text.chars().count();
        let request = AnalyzeRequest {
            text: Some(text),
            demo_mode: false,
        };

        // No credentials configured, so this degrades to the mock analysis.
        let analysis = analyze(&analyzer, &config, request).await.unwrap();
        assert_eq!(analysis.processing_mode, ProcessingMode::Mock);
        assert_eq!(analysis.text_length, Some(expected_length));
    }

    #[tokio::test]
    async fn test_health_check_reports_service() {
        let health = health_check().await;
        assert_eq!(health["status"], "healthy");
        assert_eq!(health["service"], "insurescan-rust");
    }
}

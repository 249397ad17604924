use insurescan_rust::{
    AnalysisRequest, Config, ConfigBuilder, PolicyAnalyzer, ProcessingMode, ProviderKind,
};
use insurescan_rust::llm::payload::extract_json_payload;
use insurescan_rust::preprocess::{clean, extract_important_sections};
use insurescan_rust::report::demo_analysis;

const POLICY_TEXT: &str = "This health insurance policy covers hospitalization expenses up to \
the sum insured of ₹5,00,000. Room rent is capped at 1% of sum insured per day. A co-payment \
of 10% applies to all claims for insured persons above 60 years of age. Pre-existing diseases \
carry a waiting period of 48 months from the first policy inception date.";

#[test]
fn test_config_defaults_follow_fallback_chain() {
    let config = Config::default();

    // OpenRouter is the only multi-model provider.
    assert!(config.providers.openrouter.models.len() > 1);
    assert_eq!(config.providers.gemini.models.len(), 1);
    assert_eq!(config.providers.bytez.models.len(), 1);

    // Bytez tolerates the least text before smart extraction.
    assert!(
        config.providers.bytez.large_doc_threshold
            < config.providers.openrouter.large_doc_threshold
    );
}

#[test]
fn test_config_builder_enables_providers() {
    let config = ConfigBuilder::new()
        .with_gemini_key("test-key")
        .build();

    assert!(!config.providers.openrouter.is_configured());
    assert!(config.providers.gemini.is_configured());
    assert!(!config.providers.bytez.is_configured());
    assert!(config.validate().is_ok());
}

#[test]
fn test_analysis_request_reports_length() {
    let request = AnalysisRequest::new(POLICY_TEXT);
    assert_eq!(request.text_length(), POLICY_TEXT.chars().count());
    assert!(!request.is_large(10_000));
}

#[tokio::test]
async fn test_analyze_without_credentials_returns_mock() {
    // Zero configured providers is a valid, degraded configuration: the
    // orchestrator must still produce a complete analysis.
    let config = ConfigBuilder::new().build();
    let analyzer = PolicyAnalyzer::new(&config).unwrap();

    let analysis = analyzer.analyze(POLICY_TEXT).await;

    assert_eq!(analysis.processing_mode, ProcessingMode::Mock);
    assert!(analysis.safety_score <= 100);
    for score in analysis.risk_breakdown.scores() {
        assert!(score <= 10);
    }

    // Every provider was attempted and recorded in the trail.
    assert_eq!(analysis.provider_attempts.len(), 3);
    assert_eq!(analysis.provider_attempts[0].provider, ProviderKind::OpenRouter);
    assert_eq!(analysis.provider_attempts[1].provider, ProviderKind::Gemini);
    assert_eq!(analysis.provider_attempts[2].provider, ProviderKind::Bytez);
}

#[tokio::test]
async fn test_analysis_is_stateless_across_calls() {
    let config = ConfigBuilder::new().build();
    let analyzer = PolicyAnalyzer::new(&config).unwrap();

    let first = analyzer.analyze(POLICY_TEXT).await;
    let second = analyzer.analyze(POLICY_TEXT).await;

    assert_eq!(first.processing_mode, second.processing_mode);
    assert_eq!(first.provider_attempts.len(), second.provider_attempts.len());
}

#[test]
fn test_clean_repairs_duplicated_glyph_artifact() {
    assert_eq!(clean("SSSSBBBBIIIII"), "SBI");

    let cleaned = clean(POLICY_TEXT);
    assert_eq!(clean(&cleaned), cleaned);
}

#[test]
fn test_smart_extraction_respects_budget_and_intro() {
    let large_doc = format!("{}\n", POLICY_TEXT).repeat(60);
    assert!(large_doc.chars().count() > 10_000);

    let extracted = extract_important_sections(&large_doc, 12_000);

    assert!(extracted.chars().count() <= 12_000);
    assert!(extracted.starts_with("=== POLICY INTRODUCTION ===\n"));
    let intro: String = large_doc.chars().take(1500).collect();
    assert!(extracted.contains(&intro));
}

#[test]
fn test_payload_extraction_survives_model_habits() {
    let fenced = "```json\n{\"a\":1}\n```";
    assert_eq!(extract_json_payload(fenced).unwrap()["a"], 1);

    let chatty = "Here is the result: {\"policy_type\":\"health\"} Hope this helps!";
    assert_eq!(
        extract_json_payload(chatty).unwrap()["policy_type"],
        "health"
    );
}

#[test]
fn test_demo_analysis_round_trips_as_wire_json() {
    let json = serde_json::to_string(&demo_analysis()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["processing_mode"], "mock");
    assert_eq!(value["risk_level"], "medium");
    assert!(value["risk_breakdown"]["waiting_period_risk"].is_u64());
}

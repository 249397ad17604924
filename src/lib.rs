/// InsureScan - Rust Implementation
///
/// Document-analysis relay for insurance policies: callers supply extracted
/// policy text, the library forwards it to one of several LLM providers with
/// ordered fallback and returns a structured risk assessment.

pub mod config;
pub mod llm;
pub mod preprocess;
pub mod report;

#[cfg(feature = "api")]
pub mod api;

// Re-export main types for easy access
pub use crate::config::{AnalysisConfig, Config, ConfigBuilder, ProviderSettings};
pub use crate::llm::analyzer::PolicyAnalyzer;
pub use crate::llm::{
    AnalysisRequest, PolicyProvider, ProcessingMode, ProviderAttempt, ProviderError,
    ProviderKind, ProviderResult,
};
pub use crate::report::{
    GoodFeature, JargonEntry, PolicyAnalysis, RedFlag, RiskBreakdown, RiskLevel, Severity,
};

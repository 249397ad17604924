//! Canonical analysis schema, result normalization, and the static
//! demonstration analysis used when every provider fails.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::llm::{ProcessingMode, ProviderAttempt, ProviderResult};

/// Sentinel for free-text fields the model could not extract
pub const NOT_SPECIFIED: &str = "Not specified";

/// Overall risk classification of a policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

/// Severity of a single red flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    Low,
}

/// Five named risk sub-scores, each 0-10
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskBreakdown {
    pub room_rent_risk: u8,
    pub waiting_period_risk: u8,
    pub exclusions_risk: u8,
    pub sublimits_risk: u8,
    pub copay_risk: u8,
}

impl RiskBreakdown {
    pub fn scores(&self) -> [u8; 5] {
        [
            self.room_rent_risk,
            self.waiting_period_risk,
            self.exclusions_risk,
            self.sublimits_risk,
            self.copay_risk,
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedFlag {
    pub issue: String,
    pub severity: Severity,
    pub impact: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoodFeature {
    pub feature: String,
    pub benefit: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JargonEntry {
    pub term: String,
    pub meaning: String,
}

/// The schema every caller ultimately receives.
///
/// Constructed, returned, and discarded per request; no identity beyond
/// one request/response cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyAnalysis {
    pub policy_type: String,
    pub insurer_name: String,
    pub sum_insured: String,
    pub safety_score: u8,
    pub risk_level: RiskLevel,
    pub summary: String,
    pub risk_breakdown: RiskBreakdown,
    pub red_flags: Vec<RedFlag>,
    pub good_features: Vec<GoodFeature>,
    pub coverage_gaps: Vec<String>,
    pub recommendations: Vec<String>,
    pub jargon_decoded: Vec<JargonEntry>,
    pub processing_mode: ProcessingMode,

    /// Length of the analyzed text, attached by the caller-facing layer
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub text_length: Option<usize>,

    /// Diagnostic trail of providers attempted before this result
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub provider_attempts: Vec<ProviderAttempt>,
}

/// Validate and complete a provider payload into the canonical schema.
///
/// Permissive about what it accepts, strict about what it emits: missing
/// text falls back to the sentinel, missing lists become empty, scores are
/// clamped into range, and enum-like strings coerce to a `medium` default.
/// The provenance tag always comes from the adapter.
pub fn normalize(result: ProviderResult) -> PolicyAnalysis {
    let ProviderResult { payload, mode } = result;

    PolicyAnalysis {
        policy_type: string_field(&payload, "policy_type"),
        insurer_name: string_field(&payload, "insurer_name"),
        sum_insured: string_field(&payload, "sum_insured"),
        safety_score: clamped_score(payload.get("safety_score"), 100),
        risk_level: parse_risk_level(payload.get("risk_level")),
        summary: string_field(&payload, "summary"),
        risk_breakdown: parse_risk_breakdown(payload.get("risk_breakdown")),
        red_flags: parse_red_flags(payload.get("red_flags")),
        good_features: parse_good_features(payload.get("good_features")),
        coverage_gaps: parse_string_list(payload.get("coverage_gaps")),
        recommendations: parse_string_list(payload.get("recommendations")),
        jargon_decoded: parse_jargon(payload.get("jargon_decoded")),
        processing_mode: mode,
        text_length: None,
        provider_attempts: Vec::new(),
    }
}

fn string_field(payload: &Value, key: &str) -> String {
    payload
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| NOT_SPECIFIED.to_string())
}

fn clamped_score(value: Option<&Value>, max: i64) -> u8 {
    value
        .and_then(|v| v.as_i64().or_else(|| v.as_f64().map(|f| f.round() as i64)))
        .map(|n| n.clamp(0, max) as u8)
        .unwrap_or(0)
}

fn parse_risk_level(value: Option<&Value>) -> RiskLevel {
    match value.and_then(Value::as_str).map(str::to_lowercase).as_deref() {
        Some("low") => RiskLevel::Low,
        Some("high") => RiskLevel::High,
        Some("critical") => RiskLevel::Critical,
        _ => RiskLevel::Medium,
    }
}

fn parse_severity(value: Option<&Value>) -> Severity {
    match value.and_then(Value::as_str).map(str::to_lowercase).as_deref() {
        Some("high") => Severity::High,
        Some("low") => Severity::Low,
        _ => Severity::Medium,
    }
}

fn parse_risk_breakdown(value: Option<&Value>) -> RiskBreakdown {
    let score = |key: &str| clamped_score(value.and_then(|v| v.get(key)), 10);
    RiskBreakdown {
        room_rent_risk: score("room_rent_risk"),
        waiting_period_risk: score("waiting_period_risk"),
        exclusions_risk: score("exclusions_risk"),
        sublimits_risk: score("sublimits_risk"),
        copay_risk: score("copay_risk"),
    }
}

fn parse_red_flags(value: Option<&Value>) -> Vec<RedFlag> {
    items_of(value)
        .filter_map(|item| {
            Some(RedFlag {
                issue: item.get("issue").and_then(Value::as_str)?.to_string(),
                severity: parse_severity(item.get("severity")),
                impact: item
                    .get("impact")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
            })
        })
        .collect()
}

fn parse_good_features(value: Option<&Value>) -> Vec<GoodFeature> {
    items_of(value)
        .filter_map(|item| {
            Some(GoodFeature {
                feature: item.get("feature").and_then(Value::as_str)?.to_string(),
                benefit: item
                    .get("benefit")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
            })
        })
        .collect()
}

fn parse_jargon(value: Option<&Value>) -> Vec<JargonEntry> {
    items_of(value)
        .filter_map(|item| {
            Some(JargonEntry {
                term: item.get("term").and_then(Value::as_str)?.to_string(),
                meaning: item
                    .get("meaning")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
            })
        })
        .collect()
}

fn parse_string_list(value: Option<&Value>) -> Vec<String> {
    items_of(value)
        .filter_map(|item| item.as_str().map(str::to_string))
        .collect()
}

fn items_of(value: Option<&Value>) -> impl Iterator<Item = &Value> {
    value
        .and_then(Value::as_array)
        .map(|items| items.iter())
        .unwrap_or_default()
}

/// The fully-populated demonstration analysis, returned tagged `mock` when
/// every provider fails, or tagged `demo` on explicit request.
pub fn demo_analysis() -> PolicyAnalysis {
    PolicyAnalysis {
        policy_type: "health".to_string(),
        insurer_name: "Sample Insurance Co.".to_string(),
        sum_insured: "₹5,00,000".to_string(),
        safety_score: 62,
        risk_level: RiskLevel::Medium,
        summary: "A standard health insurance policy with decent coverage but has concerning \
                  limitations on room rent, long waiting periods for pre-existing diseases, and \
                  co-payment clauses that could significantly reduce claim payouts."
            .to_string(),
        risk_breakdown: RiskBreakdown {
            room_rent_risk: 7,
            waiting_period_risk: 8,
            exclusions_risk: 5,
            sublimits_risk: 6,
            copay_risk: 7,
        },
        red_flags: vec![
            RedFlag {
                issue: "Room Rent Capped at ₹5,000/day".to_string(),
                severity: Severity::High,
                impact: "If you choose a room costing ₹8,000/day, all your expenses (surgery, \
                         medicines) will be reduced proportionally by 37.5%"
                    .to_string(),
            },
            RedFlag {
                issue: "4-year waiting period for pre-existing diseases".to_string(),
                severity: Severity::High,
                impact: "Diabetes, BP, thyroid conditions won't be covered for 4 years from \
                         policy start"
                    .to_string(),
            },
            RedFlag {
                issue: "20% co-payment for age 60+".to_string(),
                severity: Severity::High,
                impact: "Senior citizens must pay 20% of every claim from their own pocket"
                    .to_string(),
            },
            RedFlag {
                issue: "Cataract surgery sub-limit: ₹40,000 per eye".to_string(),
                severity: Severity::Medium,
                impact: "Modern cataract surgery costs ₹60,000-80,000; you'll pay the difference"
                    .to_string(),
            },
            RedFlag {
                issue: "No OPD coverage".to_string(),
                severity: Severity::Medium,
                impact: "Doctor consultations, medicines, and tests outside hospitalization not \
                         covered"
                    .to_string(),
            },
            RedFlag {
                issue: "30-day initial waiting period".to_string(),
                severity: Severity::Low,
                impact: "No claims for first 30 days except accidents".to_string(),
            },
        ],
        good_features: vec![
            GoodFeature {
                feature: "No Claim Bonus (NCB) 10% yearly".to_string(),
                benefit: "Sum insured increases by 10% each claim-free year, up to 50% bonus"
                    .to_string(),
            },
            GoodFeature {
                feature: "Free Annual Health Checkup".to_string(),
                benefit: "Preventive health checkup worth ₹2,000 covered every year".to_string(),
            },
            GoodFeature {
                feature: "500+ Day Care Procedures".to_string(),
                benefit: "Procedures not requiring 24-hour hospitalization are covered".to_string(),
            },
            GoodFeature {
                feature: "Restoration Benefit".to_string(),
                benefit: "If sum insured exhausted, it gets restored once per year".to_string(),
            },
            GoodFeature {
                feature: "Pre-hospitalization: 60 days".to_string(),
                benefit: "Medical expenses 60 days before admission are covered".to_string(),
            },
            GoodFeature {
                feature: "Post-hospitalization: 90 days".to_string(),
                benefit: "Follow-up expenses up to 90 days after discharge covered".to_string(),
            },
        ],
        coverage_gaps: vec![
            "No maternity coverage".to_string(),
            "No dental treatment coverage".to_string(),
            "No mental health/psychiatric coverage".to_string(),
            "No AYUSH (Ayurveda, Yoga, Homeopathy) treatment coverage".to_string(),
        ],
        recommendations: vec![
            "Consider a top-up plan to increase coverage without high premium".to_string(),
            "Check if employer insurance has room rent limits before choosing rooms".to_string(),
            "For parents above 60, look for policies with lower co-payment".to_string(),
            "Keep all medical records organized for pre-existing disease claims after waiting \
             period"
                .to_string(),
        ],
        jargon_decoded: vec![
            JargonEntry {
                term: "Sum Insured".to_string(),
                meaning: "Maximum amount the insurer will pay in a year".to_string(),
            },
            JargonEntry {
                term: "Co-payment".to_string(),
                meaning: "Percentage you must pay from your pocket for every claim".to_string(),
            },
            JargonEntry {
                term: "Sub-limit".to_string(),
                meaning: "Maximum cap on specific treatments, even if sum insured is higher"
                    .to_string(),
            },
            JargonEntry {
                term: "Proportionate Deduction".to_string(),
                meaning: "If room rent exceeds limit, ALL expenses are reduced by the same \
                          percentage"
                    .to_string(),
            },
            JargonEntry {
                term: "NCB (No Claim Bonus)".to_string(),
                meaning: "Reward for not making claims - increases your coverage".to_string(),
            },
        ],
        processing_mode: ProcessingMode::Mock,
        text_length: None,
        provider_attempts: Vec::new(),
    }
}

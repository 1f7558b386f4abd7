//! Oracle response sanitizer.
//!
//! Turns an untrusted, arbitrarily shaped oracle response into a payload that
//! satisfies every `AnalysisResult` invariant. There is no error path: each
//! missing, mistyped or unrecognized field is replaced by a fixed default.

use serde_json::{Map, Value};

use crate::coerce::coerce_literal;
use crate::extract::extract_payload;
use crate::model::{AnalysisResult, Detail, DetailKind, Modality, Verdict};

pub const DEFAULT_VERDICT: Verdict = Verdict::Suspicious;
pub const DEFAULT_CONFIDENCE: f64 = 50.0;
pub const MIN_CONFIDENCE: f64 = 0.0;
pub const MAX_CONFIDENCE: f64 = 100.0;
pub const DEFAULT_EXPLANATION: &str = "Analysis completed.";
pub const DEFAULT_DETAIL_LABEL: &str = "Finding";
pub const DEFAULT_DETAIL_VALUE: &str = "N/A";
pub const DEFAULT_DETAIL_KIND: DetailKind = DetailKind::Neutral;

pub const FALLBACK_EXPLANATION: &str =
    "Analysis completed with limited data. Manual review recommended.";
pub const FALLBACK_DETAIL_LABEL: &str = "Analysis";
pub const FALLBACK_DETAIL_VALUE: &str = "Partial results available";
pub const FALLBACK_FLAG: &str = "Automated analysis inconclusive";

/// The modality-independent part of an `AnalysisResult`.
#[derive(Debug, Clone, PartialEq)]
pub struct SanitizedPayload {
    pub verdict: Verdict,
    pub confidence: f64,
    pub explanation: String,
    pub details: Vec<Detail>,
    pub flags: Vec<String>,
}

impl SanitizedPayload {
    /// Terminal record used when no structured payload could be extracted.
    pub fn fallback() -> Self {
        Self {
            verdict: Verdict::Suspicious,
            confidence: DEFAULT_CONFIDENCE,
            explanation: FALLBACK_EXPLANATION.to_string(),
            details: vec![Detail {
                label: FALLBACK_DETAIL_LABEL.to_string(),
                value: FALLBACK_DETAIL_VALUE.to_string(),
                kind: DetailKind::Neutral,
            }],
            flags: vec![FALLBACK_FLAG.to_string()],
        }
    }

    pub fn into_result(self, modality: Modality) -> AnalysisResult {
        AnalysisResult {
            modality,
            verdict: self.verdict,
            confidence: self.confidence,
            explanation: self.explanation,
            details: self.details,
            flags: self.flags,
        }
    }
}

/// Sanitize a decoded oracle response. A non-object value is treated as an
/// object with every field missing.
pub fn sanitize(raw: &Value) -> SanitizedPayload {
    let empty = Map::new();
    let obj = raw.as_object().unwrap_or(&empty);

    SanitizedPayload {
        verdict: coerce_literal(obj.get("verdict"), DEFAULT_VERDICT),
        confidence: sanitize_confidence(obj.get("confidence")),
        explanation: sanitize_explanation(obj.get("explanation")),
        details: sanitize_details(obj.get("details")),
        flags: sanitize_flags(obj.get("flags")),
    }
}

/// Extract the structured payload from raw oracle text and sanitize it,
/// or return the terminal fallback when nothing usable is found.
pub fn sanitize_output(text: &str) -> SanitizedPayload {
    match extract_payload(text) {
        Some(value) => sanitize(&value),
        None => {
            log::warn!("oracle output has no structured payload; using fallback record");
            SanitizedPayload::fallback()
        }
    }
}

pub fn clamp_confidence(c: f64) -> f64 {
    if c.is_nan() {
        return DEFAULT_CONFIDENCE;
    }
    c.clamp(MIN_CONFIDENCE, MAX_CONFIDENCE)
}

fn sanitize_confidence(raw: Option<&Value>) -> f64 {
    match raw.and_then(Value::as_f64) {
        Some(c) => clamp_confidence(c),
        None => {
            log::debug!("confidence missing or non-numeric, defaulting to {DEFAULT_CONFIDENCE}");
            DEFAULT_CONFIDENCE
        }
    }
}

fn sanitize_explanation(raw: Option<&Value>) -> String {
    match raw {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        _ => DEFAULT_EXPLANATION.to_string(),
    }
}

fn sanitize_details(raw: Option<&Value>) -> Vec<Detail> {
    let Some(Value::Array(items)) = raw else {
        return Vec::new();
    };
    items.iter().map(sanitize_detail).collect()
}

fn sanitize_detail(item: &Value) -> Detail {
    let field = |name: &str| item.as_object().and_then(|o| o.get(name));
    // The oracle reports polarity as `type`; `kind` is accepted as a synonym.
    let kind = field("type").or_else(|| field("kind"));

    Detail {
        label: stringify(field("label"), DEFAULT_DETAIL_LABEL),
        value: stringify(field("value"), DEFAULT_DETAIL_VALUE),
        kind: coerce_literal(kind, DEFAULT_DETAIL_KIND),
    }
}

fn sanitize_flags(raw: Option<&Value>) -> Vec<String> {
    let Some(Value::Array(items)) = raw else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|v| v.as_str().map(str::to_string))
        .collect()
}

/// Render a scalar as text; missing/null uses `fallback`, containers are
/// rendered as compact JSON.
fn stringify(raw: Option<&Value>, fallback: &str) -> String {
    match raw {
        None | Some(Value::Null) => fallback.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(other) => other.to_string(),
    }
}

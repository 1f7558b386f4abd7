use serde::{Deserialize, Serialize};

use crate::coerce::Literal;

// ---------------------------------------------------------------------------
// Enumerations
// ---------------------------------------------------------------------------

/// Content channel an analysis was run on. Determines fusion weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Modality {
    Text,
    Url,
    Image,
    Video,
    Document,
    Audio,
}

impl Literal for Modality {
    const ALL: &'static [Self] = &[
        Self::Text,
        Self::Url,
        Self::Image,
        Self::Video,
        Self::Document,
        Self::Audio,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Url => "url",
            Self::Image => "image",
            Self::Video => "video",
            Self::Document => "document",
            Self::Audio => "audio",
        }
    }
}

impl std::fmt::Display for Modality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Modality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_literal(s).ok_or_else(|| {
            format!("unknown modality '{s}' (expected text, url, image, video, document or audio)")
        })
    }
}

/// Authenticity verdict.
///
/// Ordered from least to most trustworthy: `Fake < Suspicious < Authentic`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Fake,
    Suspicious,
    Authentic,
}

impl Literal for Verdict {
    const ALL: &'static [Self] = &[Self::Authentic, Self::Suspicious, Self::Fake];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Authentic => "authentic",
            Self::Suspicious => "suspicious",
            Self::Fake => "fake",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Polarity of a single evidence item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetailKind {
    Positive,
    Negative,
    Neutral,
}

impl Literal for DetailKind {
    const ALL: &'static [Self] = &[Self::Positive, Self::Negative, Self::Neutral];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Neutral => "neutral",
        }
    }
}

impl std::fmt::Display for DetailKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Per-modality result
// ---------------------------------------------------------------------------

/// One evidence item reported by the oracle. `kind` travels as `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detail {
    pub label: String,
    pub value: String,
    #[serde(rename = "type")]
    pub kind: DetailKind,
}

/// Canonical per-modality record. `confidence` is always within `[0, 100]`
/// and `explanation` is never empty once produced by the sanitizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub modality: Modality,
    pub verdict: Verdict,
    pub confidence: f64,
    pub explanation: String,
    pub details: Vec<Detail>,
    pub flags: Vec<String>,
}

// ---------------------------------------------------------------------------
// Fusion output
// ---------------------------------------------------------------------------

/// Overall judgment over every result gathered in a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultimodalResult {
    pub overall_verdict: Verdict,
    pub overall_confidence: u8,
    pub fusion_explanation: String,
    /// Full history in arrival order, duplicates included.
    pub modalities: Vec<AnalysisResult>,
}

/// Intermediate arithmetic of one fusion pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FusionScore {
    pub count: usize,
    pub weighted_score: f64,
    pub total_weight: f64,
    pub normalized_score: f64,
    pub authentic_count: usize,
    pub suspicious_count: usize,
    pub fake_count: usize,
    pub overall_confidence: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verdict_order_is_fake_suspicious_authentic() {
        assert!(Verdict::Fake < Verdict::Suspicious);
        assert!(Verdict::Suspicious < Verdict::Authentic);
        assert_eq!(
            [Verdict::Authentic, Verdict::Fake, Verdict::Suspicious].iter().min(),
            Some(&Verdict::Fake)
        );
    }

    #[test]
    fn detail_kind_travels_as_type() {
        let detail = Detail {
            label: "AI Generation".into(),
            value: "Not detected".into(),
            kind: DetailKind::Positive,
        };
        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["type"], "positive");
        assert!(json.get("kind").is_none());
    }

    #[test]
    fn multimodal_result_uses_camel_case() {
        let result = MultimodalResult {
            overall_verdict: Verdict::Suspicious,
            overall_confidence: 61,
            fusion_explanation: "x".into(),
            modalities: Vec::new(),
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["overallVerdict"], "suspicious");
        assert_eq!(json["overallConfidence"], 61);
        assert!(json.get("fusionExplanation").is_some());
    }

    #[test]
    fn modality_parses_from_cli_strings() {
        assert_eq!("image".parse::<Modality>().unwrap(), Modality::Image);
        let err = "pdf".parse::<Modality>().unwrap_err();
        assert!(err.contains("'pdf'"));
    }
}

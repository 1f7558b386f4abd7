//! JSON report emitted by `fuse` and `replay --json`.

use serde::Serialize;
use truthlens_fusion::model::FusionScore;
use truthlens_fusion::MultimodalResult;

use crate::exit_codes::EXIT_ERROR;
use crate::CliError;

#[derive(Debug, Serialize)]
pub struct ReportMeta {
    pub engine_version: String,
    pub generated_at: String,
    /// Policy file path, or `default`.
    pub policy: String,
}

#[derive(Debug, Serialize)]
pub struct FusionReport {
    pub meta: ReportMeta,
    pub score: FusionScore,
    pub result: MultimodalResult,
}

impl FusionReport {
    pub fn new(policy: String, score: FusionScore, result: MultimodalResult) -> Self {
        Self {
            meta: ReportMeta {
                engine_version: env!("CARGO_PKG_VERSION").to_string(),
                generated_at: chrono::Utc::now().to_rfc3339(),
                policy,
            },
            score,
            result,
        }
    }

    pub fn to_json(&self) -> Result<String, CliError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| CliError::new(EXIT_ERROR, format!("JSON serialization error: {e}")))
    }

    /// One-line human summary for stderr.
    pub fn summary_line(&self) -> String {
        let s = &self.score;
        format!(
            "{} ({}% confidence) over {} results: {} authentic, {} suspicious, {} fake; score {:.3}",
            self.result.overall_verdict,
            self.result.overall_confidence,
            s.count,
            s.authentic_count,
            s.suspicious_count,
            s.fake_count,
            s.normalized_score,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use truthlens_fusion::{fuse, score, AnalysisResult, FusionPolicy, Modality, Verdict};

    fn result(modality: Modality, verdict: Verdict, confidence: f64) -> AnalysisResult {
        AnalysisResult {
            modality,
            verdict,
            confidence,
            explanation: "x".into(),
            details: Vec::new(),
            flags: Vec::new(),
        }
    }

    #[test]
    fn report_shape() {
        let policy = FusionPolicy::default();
        let results = vec![
            result(Modality::Text, Verdict::Authentic, 90.0),
            result(Modality::Image, Verdict::Fake, 80.0),
        ];
        let report = FusionReport::new(
            "default".into(),
            score(&results, &policy).unwrap(),
            fuse(&results, &policy).unwrap(),
        );
        let v: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(v["meta"]["policy"], "default");
        assert_eq!(v["score"]["count"], 2);
        assert_eq!(v["result"]["overallVerdict"], "fake");
        assert_eq!(v["result"]["overallConfidence"], 85);

        let line = report.summary_line();
        assert!(line.starts_with("fake (85% confidence) over 2 results"), "{line}");
    }
}

//! Multimodal fusion: fold every result gathered in a session into one
//! overall verdict, confidence and explanation.
//!
//! Recomputed from scratch over the full history on every change. Any `fake`
//! vote, or a low blended score, makes the whole session `fake` regardless of
//! the other channels.

use crate::config::FusionPolicy;
use crate::model::{AnalysisResult, FusionScore, MultimodalResult, Verdict};

/// Compute the fusion arithmetic. `None` for an empty list.
pub fn score(results: &[AnalysisResult], policy: &FusionPolicy) -> Option<FusionScore> {
    if results.is_empty() {
        return None;
    }

    let mut weighted_score = 0.0;
    let mut total_weight = 0.0;
    let mut confidence_sum = 0.0;
    let mut authentic_count = 0;
    let mut suspicious_count = 0;
    let mut fake_count = 0;

    // Duplicated modalities count once per occurrence.
    for r in results {
        let w = policy.weights.weight(r.modality);
        total_weight += w;
        weighted_score += w * policy.trust.score(r.verdict) * (r.confidence / 100.0);
        confidence_sum += r.confidence;

        match r.verdict {
            Verdict::Authentic => authentic_count += 1,
            Verdict::Suspicious => suspicious_count += 1,
            Verdict::Fake => fake_count += 1,
        }
    }

    // Weights renormalize over the modalities actually present.
    let normalized_score = if total_weight > 0.0 {
        weighted_score / total_weight
    } else {
        0.0
    };
    let mean_confidence = confidence_sum / results.len() as f64;

    Some(FusionScore {
        count: results.len(),
        weighted_score,
        total_weight,
        normalized_score,
        authentic_count,
        suspicious_count,
        fake_count,
        overall_confidence: mean_confidence.round().clamp(0.0, 100.0) as u8,
    })
}

/// Pick the overall verdict, first match wins.
pub fn decide(score: &FusionScore, policy: &FusionPolicy) -> Verdict {
    let th = &policy.thresholds;
    if score.fake_count > 0 || score.normalized_score < th.fake_below {
        Verdict::Fake
    } else if score.suspicious_count > 0 || score.normalized_score < th.suspicious_below {
        Verdict::Suspicious
    } else {
        Verdict::Authentic
    }
}

/// Fuse the whole result history. `None` for an empty list; the input is
/// only read.
pub fn fuse(results: &[AnalysisResult], policy: &FusionPolicy) -> Option<MultimodalResult> {
    let score = score(results, policy)?;
    let overall_verdict = decide(&score, policy);

    log::debug!(
        "fused {} result(s): normalized={:.3} fake={} suspicious={} -> {}",
        score.count,
        score.normalized_score,
        score.fake_count,
        score.suspicious_count,
        overall_verdict,
    );

    Some(MultimodalResult {
        overall_verdict,
        overall_confidence: score.overall_confidence,
        fusion_explanation: explain(overall_verdict, &score),
        modalities: results.to_vec(),
    })
}

fn explain(verdict: Verdict, score: &FusionScore) -> String {
    let n = score.count;
    match verdict {
        Verdict::Fake => format!(
            "Multimodal analysis detected manipulation across {n} {}. {} flagged as fake.",
            plural(n, "modality", "modalities"),
            count_phrase(score.fake_count),
        ),
        Verdict::Suspicious => format!(
            "Cross-modal analysis reveals inconsistencies across {n} {}. {} flagged as suspicious; further investigation is warranted.",
            plural(n, "modality", "modalities"),
            count_phrase(score.suspicious_count),
        ),
        Verdict::Authentic => format!(
            "All {n} analyzed {} show consistent authentic patterns. No manipulation markers detected.",
            plural(n, "modality", "modalities"),
        ),
    }
}

fn count_phrase(count: usize) -> String {
    format!("{count} {}", plural(count, "modality", "modalities"))
}

fn plural<'a>(n: usize, one: &'a str, many: &'a str) -> &'a str {
    if n == 1 {
        one
    } else {
        many
    }
}

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::FusionError;
use crate::model::{Modality, Verdict};

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

pub const TEXT_WEIGHT: f64 = 0.20;
pub const URL_WEIGHT: f64 = 0.15;
pub const IMAGE_WEIGHT: f64 = 0.25;
pub const VIDEO_WEIGHT: f64 = 0.20;
pub const DOCUMENT_WEIGHT: f64 = 0.10;
pub const AUDIO_WEIGHT: f64 = 0.10;

pub const AUTHENTIC_TRUST: f64 = 1.0;
pub const SUSPICIOUS_TRUST: f64 = 0.5;
pub const FAKE_TRUST: f64 = 0.0;

/// Blended scores strictly below this are judged fake.
pub const FAKE_BELOW: f64 = 0.30;
/// Blended scores strictly below this (and not fake) are judged suspicious.
pub const SUSPICIOUS_BELOW: f64 = 0.70;

// ---------------------------------------------------------------------------
// Top-level policy
// ---------------------------------------------------------------------------

/// Tunable fusion policy. Every table is optional in TOML; omitted tables
/// take the defaults above.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FusionPolicy {
    #[serde(default)]
    pub weights: WeightTable,
    #[serde(default)]
    pub trust: TrustScores,
    #[serde(default)]
    pub thresholds: Thresholds,
}

// ---------------------------------------------------------------------------
// Weights
// ---------------------------------------------------------------------------

/// Assumed reliability of each channel. One field per modality, all required
/// when the table is given, so the table always covers every variant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WeightTable {
    pub text: f64,
    pub url: f64,
    pub image: f64,
    pub video: f64,
    pub document: f64,
    pub audio: f64,
}

impl Default for WeightTable {
    fn default() -> Self {
        Self {
            text: TEXT_WEIGHT,
            url: URL_WEIGHT,
            image: IMAGE_WEIGHT,
            video: VIDEO_WEIGHT,
            document: DOCUMENT_WEIGHT,
            audio: AUDIO_WEIGHT,
        }
    }
}

impl WeightTable {
    pub fn weight(&self, modality: Modality) -> f64 {
        match modality {
            Modality::Text => self.text,
            Modality::Url => self.url,
            Modality::Image => self.image,
            Modality::Video => self.video,
            Modality::Document => self.document,
            Modality::Audio => self.audio,
        }
    }
}

// ---------------------------------------------------------------------------
// Trust scores + thresholds
// ---------------------------------------------------------------------------

/// Numeric trust assigned to each verdict inside the fusion arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TrustScores {
    #[serde(default = "default_authentic")]
    pub authentic: f64,
    #[serde(default = "default_suspicious")]
    pub suspicious: f64,
    #[serde(default = "default_fake")]
    pub fake: f64,
}

fn default_authentic() -> f64 {
    AUTHENTIC_TRUST
}

fn default_suspicious() -> f64 {
    SUSPICIOUS_TRUST
}

fn default_fake() -> f64 {
    FAKE_TRUST
}

impl Default for TrustScores {
    fn default() -> Self {
        Self {
            authentic: AUTHENTIC_TRUST,
            suspicious: SUSPICIOUS_TRUST,
            fake: FAKE_TRUST,
        }
    }
}

impl TrustScores {
    pub fn score(&self, verdict: Verdict) -> f64 {
        match verdict {
            Verdict::Authentic => self.authentic,
            Verdict::Suspicious => self.suspicious,
            Verdict::Fake => self.fake,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Thresholds {
    #[serde(default = "default_fake_below")]
    pub fake_below: f64,
    #[serde(default = "default_suspicious_below")]
    pub suspicious_below: f64,
}

fn default_fake_below() -> f64 {
    FAKE_BELOW
}

fn default_suspicious_below() -> f64 {
    SUSPICIOUS_BELOW
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            fake_below: FAKE_BELOW,
            suspicious_below: SUSPICIOUS_BELOW,
        }
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl FusionPolicy {
    pub fn from_toml(input: &str) -> Result<Self, FusionError> {
        let policy: FusionPolicy =
            toml::from_str(input).map_err(|e| FusionError::ConfigParse(e.to_string()))?;
        policy.validate()?;
        Ok(policy)
    }

    pub fn load(path: &Path) -> Result<Self, FusionError> {
        let input = std::fs::read_to_string(path)
            .map_err(|e| FusionError::Io(format!("cannot read {}: {e}", path.display())))?;
        let policy = Self::from_toml(&input)?;
        log::info!("loaded fusion policy from {}", path.display());
        Ok(policy)
    }

    pub fn to_toml(&self) -> Result<String, FusionError> {
        toml::to_string_pretty(self).map_err(|e| FusionError::ConfigParse(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), FusionError> {
        // Every modality must carry a positive weight, otherwise a session of
        // only that modality would have nothing to normalize by.
        for modality in <Modality as crate::coerce::Literal>::ALL {
            let w = self.weights.weight(*modality);
            if !w.is_finite() || w <= 0.0 {
                return Err(FusionError::ConfigValidation(format!(
                    "weight for '{modality}' must be a positive number, got {w}"
                )));
            }
        }

        let t = &self.trust;
        let scores = [("authentic", t.authentic), ("suspicious", t.suspicious), ("fake", t.fake)];
        for (name, s) in scores {
            if !s.is_finite() || !(0.0..=1.0).contains(&s) {
                return Err(FusionError::ConfigValidation(format!(
                    "trust score for '{name}' must be within [0, 1], got {s}"
                )));
            }
        }
        if !(t.fake <= t.suspicious && t.suspicious <= t.authentic) {
            return Err(FusionError::ConfigValidation(
                "trust scores must be ordered fake <= suspicious <= authentic".into(),
            ));
        }

        let th = &self.thresholds;
        if !th.fake_below.is_finite() || !th.suspicious_below.is_finite() {
            return Err(FusionError::ConfigValidation("thresholds must be finite".into()));
        }
        let ordered = 0.0 <= th.fake_below
            && th.fake_below <= th.suspicious_below
            && th.suspicious_below <= 1.0;
        if !ordered {
            return Err(FusionError::ConfigValidation(format!(
                "thresholds must satisfy 0 <= fake_below ({}) <= suspicious_below ({}) <= 1",
                th.fake_below, th.suspicious_below
            )));
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

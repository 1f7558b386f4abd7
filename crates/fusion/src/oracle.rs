//! Seam to the external content-analysis oracle.
//!
//! The transport lives outside this crate; an `Oracle` implementation only
//! has to turn a request payload into the judge's raw text output. Everything
//! after that (extraction, sanitization, session update) happens here.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::{AnalysisResult, Modality, Verdict};
use crate::sanitize::{sanitize_output, SanitizedPayload, DEFAULT_CONFIDENCE};
use crate::session::SharedSession;

pub const NO_FRAMES_EXPLANATION: &str = "Could not extract frames from video for analysis";
pub const NO_FRAMES_FLAG: &str = "Unable to process video";

// ---------------------------------------------------------------------------
// Request payload
// ---------------------------------------------------------------------------

/// Modality-specific request body sent to the oracle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPayload {
    Text {
        content: String,
    },
    Url {
        content: String,
    },
    #[serde(rename_all = "camelCase")]
    Image {
        image_base64: String,
        mime_type: String,
    },
    #[serde(rename_all = "camelCase")]
    Video {
        video_frames: Vec<String>,
    },
    #[serde(rename_all = "camelCase")]
    Document {
        document_base64: String,
        file_name: String,
        mime_type: String,
    },
    #[serde(rename_all = "camelCase")]
    Audio {
        audio_base64: String,
        file_name: String,
        mime_type: String,
    },
}

impl ContentPayload {
    pub fn modality(&self) -> Modality {
        match self {
            Self::Text { .. } => Modality::Text,
            Self::Url { .. } => Modality::Url,
            Self::Image { .. } => Modality::Image,
            Self::Video { .. } => Modality::Video,
            Self::Document { .. } => Modality::Document,
            Self::Audio { .. } => Modality::Audio,
        }
    }

    /// Reject payloads the oracle cannot possibly judge.
    pub fn validate(&self) -> Result<(), OracleError> {
        match self {
            Self::Text { content } => {
                if content.trim().is_empty() {
                    return Err(OracleError::InvalidRequest("text content is empty".into()));
                }
            }
            Self::Url { content } => {
                let parsed = url::Url::parse(content.trim()).map_err(|e| {
                    OracleError::InvalidRequest(format!("invalid URL '{content}': {e}"))
                })?;
                if parsed.host_str().is_none() {
                    return Err(OracleError::InvalidRequest(format!("URL '{content}' has no host")));
                }
            }
            Self::Image { image_base64, .. } => require_body("image", image_base64)?,
            // An empty frame list is handled without calling the oracle.
            Self::Video { .. } => {}
            Self::Document { document_base64, .. } => require_body("document", document_base64)?,
            Self::Audio { audio_base64, .. } => require_body("audio", audio_base64)?,
        }
        Ok(())
    }
}

fn require_body(what: &str, base64: &str) -> Result<(), OracleError> {
    if base64.is_empty() {
        return Err(OracleError::InvalidRequest(format!("{what} body is empty")));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Oracle trait + errors
// ---------------------------------------------------------------------------

/// An external judge. Returns the raw text the judge produced.
pub trait Oracle: Send + Sync {
    fn judge(&self, payload: &ContentPayload) -> Result<String, OracleError>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum OracleError {
    /// Payload rejected before reaching the oracle.
    InvalidRequest(String),
    /// Upstream rate limit (HTTP 429).
    RateLimited,
    /// Upstream credits exhausted (HTTP 402).
    CreditsExhausted,
    /// Any other transport or upstream failure.
    Unavailable(String),
}

impl OracleError {
    /// Map a failed upstream HTTP status to an error.
    pub fn from_status(status: u16, body: &str) -> Self {
        match status {
            429 => Self::RateLimited,
            402 => Self::CreditsExhausted,
            _ => Self::Unavailable(format!("HTTP {status}: {body}")),
        }
    }
}

impl fmt::Display for OracleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidRequest(msg) => write!(f, "invalid request: {msg}"),
            Self::RateLimited => write!(f, "rate limit exceeded, try again in a moment"),
            Self::CreditsExhausted => write!(f, "analysis credits exhausted"),
            Self::Unavailable(msg) => write!(f, "analysis failed: {msg}"),
        }
    }
}

impl std::error::Error for OracleError {}

// ---------------------------------------------------------------------------
// Analysis
// ---------------------------------------------------------------------------

/// Judge one payload and turn the oracle output into a canonical result.
/// Does not touch any session.
pub fn judge(oracle: &dyn Oracle, payload: &ContentPayload) -> Result<AnalysisResult, OracleError> {
    payload.validate()?;
    let modality = payload.modality();

    if let ContentPayload::Video { video_frames } = payload {
        if video_frames.is_empty() {
            log::warn!("video payload has no frames; skipping oracle call");
            return Ok(no_frames_payload().into_result(modality));
        }
    }

    let output = oracle.judge(payload).map_err(|e| {
        log::warn!("oracle call for {modality} failed: {e}");
        e
    })?;
    Ok(sanitize_output(&output).into_result(modality))
}

/// Judge one payload and append the result to `session`.
///
/// The oracle is called without holding the session lock; on error nothing
/// is sanitized and the session is left untouched.
pub fn analyze(
    session: &SharedSession,
    oracle: &dyn Oracle,
    payload: &ContentPayload,
) -> Result<AnalysisResult, OracleError> {
    let result = judge(oracle, payload)?;
    session.append(result.clone());
    Ok(result)
}

fn no_frames_payload() -> SanitizedPayload {
    SanitizedPayload {
        verdict: Verdict::Suspicious,
        confidence: DEFAULT_CONFIDENCE,
        explanation: NO_FRAMES_EXPLANATION.to_string(),
        details: Vec::new(),
        flags: vec![NO_FRAMES_FLAG.to_string()],
    }
}

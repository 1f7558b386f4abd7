//! `truthlens-fusion`: oracle result sanitizer and multimodal verdict fusion.
//!
//! Pure engine crate: receives raw oracle output, returns canonical
//! per-modality results and one fused overall verdict.
//! No CLI or network dependencies; the oracle is reached through a trait.

pub mod coerce;
pub mod config;
pub mod error;
pub mod extract;
pub mod fusion;
pub mod model;
pub mod oracle;
pub mod sanitize;
pub mod session;

pub use config::FusionPolicy;
pub use error::FusionError;
pub use fusion::{fuse, score};
pub use model::{AnalysisResult, Detail, DetailKind, Modality, MultimodalResult, Verdict};
pub use oracle::{analyze, ContentPayload, Oracle, OracleError};
pub use sanitize::{sanitize, sanitize_output, SanitizedPayload};
pub use session::{Session, SharedSession};

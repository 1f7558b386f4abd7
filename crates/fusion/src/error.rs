use std::fmt;

#[derive(Debug)]
pub enum FusionError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Policy validation error (non-positive weight, inverted thresholds, etc.).
    ConfigValidation(String),
    /// IO error (policy file read, etc.).
    Io(String),
}

impl fmt::Display for FusionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "policy parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "policy validation error: {msg}"),
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for FusionError {}

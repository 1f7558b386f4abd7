//! Unknown-literal → safe-default coercion shared by every closed string set
//! the oracle reports (verdicts, detail kinds).

use serde_json::Value;

/// A closed set of string literals.
pub trait Literal: Copy + 'static {
    /// Every accepted value.
    const ALL: &'static [Self];

    fn as_str(&self) -> &'static str;

    /// Exact, case-sensitive lookup.
    fn from_literal(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.as_str() == s)
    }
}

/// Keep `raw` only if it is a string exactly matching one of `T::ALL`;
/// anything else (missing, wrong type, unknown literal) becomes `default`.
pub fn coerce_literal<T: Literal>(raw: Option<&Value>, default: T) -> T {
    match raw {
        Some(Value::String(s)) => T::from_literal(s).unwrap_or_else(|| {
            log::debug!("unknown literal '{s}', defaulting to '{}'", default.as_str());
            default
        }),
        _ => default,
    }
}

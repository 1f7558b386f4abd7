//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain           | Description                              |
//! |---------|------------------|------------------------------------------|
//! | 0       | Universal        | Success                                  |
//! | 1       | Universal        | General error (unspecified)              |
//! | 2       | Universal        | CLI usage error (bad args, missing file) |
//! | 3-4     | verdict          | Overall verdict under `--strict-exit`    |
//! | 5-6     | input            | Unreadable or malformed input            |
//! | 7       | policy           | Fusion policy invalid                    |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant in the appropriate range
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant command's error handling

use truthlens_fusion::{FusionError, Verdict};

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Verdict (3-4), only with --strict-exit
// =============================================================================

/// Overall verdict is `fake`.
pub const EXIT_VERDICT_FAKE: u8 = 3;

/// Overall verdict is `suspicious`.
pub const EXIT_VERDICT_SUSPICIOUS: u8 = 4;

// =============================================================================
// Input (5-6)
// =============================================================================

/// Input could not be parsed (bad JSON, unknown modality, bad transcript line).
pub const EXIT_INPUT_PARSE: u8 = 5;

/// Input or output file could not be read or written.
pub const EXIT_INPUT_IO: u8 = 6;

// =============================================================================
// Policy (7)
// =============================================================================

/// Policy file failed to parse or validate.
pub const EXIT_POLICY_INVALID: u8 = 7;

/// Exit code for an overall verdict under `--strict-exit`.
pub fn verdict_exit_code(verdict: Verdict) -> u8 {
    match verdict {
        Verdict::Authentic => EXIT_SUCCESS,
        Verdict::Suspicious => EXIT_VERDICT_SUSPICIOUS,
        Verdict::Fake => EXIT_VERDICT_FAKE,
    }
}

/// Map a policy loading error to its exit code.
pub fn policy_exit_code(err: &FusionError) -> u8 {
    match err {
        FusionError::ConfigParse(_) | FusionError::ConfigValidation(_) => EXIT_POLICY_INVALID,
        FusionError::Io(_) => EXIT_INPUT_IO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verdict_codes_are_distinct() {
        assert_eq!(verdict_exit_code(Verdict::Authentic), 0);
        assert_ne!(verdict_exit_code(Verdict::Fake), verdict_exit_code(Verdict::Suspicious));
    }

    #[test]
    fn policy_errors_map() {
        assert_eq!(policy_exit_code(&FusionError::ConfigParse("x".into())), EXIT_POLICY_INVALID);
        assert_eq!(policy_exit_code(&FusionError::Io("x".into())), EXIT_INPUT_IO);
    }
}

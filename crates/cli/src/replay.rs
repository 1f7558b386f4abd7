//! Transcript replay: drive a session from recorded oracle responses.
//!
//! Each JSONL line is one oracle event, in arrival order:
//!
//! ```text
//! {"modality": "text", "output": "<raw oracle text>"}
//! {"modality": "image", "error": "upstream timeout"}
//! {"modality": "audio", "status": 429, "error": "slow down"}
//! ```
//!
//! Successful outputs go through extraction and sanitization and are
//! appended to the session; failed calls are reported and never voted.

use std::path::PathBuf;

use serde::Deserialize;
use truthlens_fusion::{sanitize_output, score, Modality, OracleError, Session};

use crate::exit_codes::{verdict_exit_code, EXIT_INPUT_PARSE, EXIT_SUCCESS};
use crate::input::{load_policy, read_source};
use crate::report::FusionReport;
use crate::CliError;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TranscriptEvent {
    modality: Modality,
    #[serde(default)]
    output: Option<String>,
    #[serde(default)]
    error: Option<String>,
    /// Upstream HTTP status of a failed call.
    #[serde(default)]
    status: Option<u16>,
}

/// What the oracle returned for one call.
#[derive(Debug, PartialEq)]
enum Outcome {
    Output(String),
    Failed(OracleError),
}

impl TranscriptEvent {
    fn into_outcome(self, line: usize) -> Result<(Modality, Outcome), CliError> {
        let outcome = match (self.output, self.error, self.status) {
            (Some(output), None, None) => Outcome::Output(output),
            (None, Some(body), Some(status)) => {
                Outcome::Failed(OracleError::from_status(status, &body))
            }
            (None, Some(body), None) => Outcome::Failed(OracleError::Unavailable(body)),
            (None, None, Some(status)) => Outcome::Failed(OracleError::from_status(status, "")),
            _ => {
                return Err(CliError::new(
                    EXIT_INPUT_PARSE,
                    format!("line {line}: event needs exactly one of 'output' or 'error'"),
                ))
            }
        };
        Ok((self.modality, outcome))
    }
}

fn parse_transcript(text: &str) -> Result<Vec<(usize, Modality, Outcome)>, CliError> {
    let mut events = Vec::new();
    for (i, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let event: TranscriptEvent = serde_json::from_str(line).map_err(|e| {
            CliError::new(EXIT_INPUT_PARSE, format!("line {}: invalid event: {e}", i + 1))
        })?;
        let (modality, outcome) = event.into_outcome(i + 1)?;
        events.push((i + 1, modality, outcome));
    }
    Ok(events)
}

pub fn cmd_replay(
    input: Option<PathBuf>,
    policy_path: Option<PathBuf>,
    json_output: bool,
    strict_exit: bool,
) -> Result<(), CliError> {
    let (policy, policy_label) = load_policy(policy_path.as_ref())?;
    let text = read_source(input.as_deref())?;
    let events = parse_transcript(&text)?;
    log::info!("replaying {} oracle event(s)", events.len());

    let mut session = Session::new(policy);
    let mut failed = 0usize;

    for (line, modality, outcome) in events {
        match outcome {
            Outcome::Output(raw) => {
                let result = sanitize_output(&raw).into_result(modality);
                let (verdict, confidence) = (result.verdict, result.confidence);
                let fusion = session.append(result);
                eprintln!(
                    "[{}] {modality}: {verdict} ({confidence:.0}%) -> overall {} ({}%)",
                    fusion.modalities.len(),
                    fusion.overall_verdict,
                    fusion.overall_confidence,
                );
            }
            Outcome::Failed(err) => {
                failed += 1;
                eprintln!("line {line}: {modality}: {err} (skipped)");
            }
        }
    }

    let results = session.results();
    let (Some(score), Some(result)) = (score(results, session.policy()), session.fusion().cloned())
    else {
        return Err(CliError::new(EXIT_INPUT_PARSE, "transcript produced no analysis results")
            .with_hint("every event failed or the transcript is empty"));
    };

    let report = FusionReport::new(policy_label, score, result);
    if json_output {
        println!("{}", report.to_json()?);
    }
    eprintln!("{}", report.summary_line());
    if failed > 0 {
        eprintln!("{failed} failed call(s) skipped");
    }

    if strict_exit {
        let code = verdict_exit_code(report.result.overall_verdict);
        if code != EXIT_SUCCESS {
            return Err(CliError::new(code, String::new()));
        }
    }
    Ok(())
}

//! Reading inputs: raw oracle output, result sets, policies.

use std::io::Read;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use truthlens_fusion::coerce::Literal;
use truthlens_fusion::{sanitize, AnalysisResult, FusionPolicy, Modality};

use crate::exit_codes::{policy_exit_code, EXIT_INPUT_IO, EXIT_INPUT_PARSE};
use crate::CliError;

/// Read a whole file, or stdin when `path` is absent or `-`.
pub fn read_source(path: Option<&Path>) -> Result<String, CliError> {
    match path {
        Some(p) if p != Path::new("-") => std::fs::read_to_string(p).map_err(|e| {
            CliError::new(EXIT_INPUT_IO, format!("cannot read {}: {e}", p.display()))
        }),
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| CliError::new(EXIT_INPUT_IO, format!("cannot read stdin: {e}")))?;
            Ok(buf)
        }
    }
}

/// Load the policy at `path`, or the built-in default. Returns the policy and
/// a label naming where it came from.
pub fn load_policy(path: Option<&PathBuf>) -> Result<(FusionPolicy, String), CliError> {
    match path {
        Some(p) => {
            let policy = FusionPolicy::load(p)
                .map_err(|e| CliError::new(policy_exit_code(&e), e.to_string()))?;
            Ok((policy, p.display().to_string()))
        }
        None => Ok((FusionPolicy::default(), "default".to_string())),
    }
}

/// Parse a result set: a JSON array of records, a prior fusion output (a
/// fusion result with `modalities`, or a `tlens fuse` report with
/// `result.modalities`), or JSONL with one record per line.
///
/// Records are untrusted, so every record is re-sanitized; only the
/// `modality` field must be valid.
pub fn parse_results(text: &str) -> Result<Vec<AnalysisResult>, CliError> {
    let records: Vec<(usize, Value)> = match serde_json::from_str::<Value>(text) {
        Ok(Value::Array(items)) => number(items),
        Ok(Value::Object(obj)) => match fused_records(&obj).map(<[Value]>::to_vec) {
            Some(items) => number(items),
            None => vec![(1, Value::Object(obj))],
        },
        Ok(_) => {
            return Err(CliError::new(
                EXIT_INPUT_PARSE,
                "expected a JSON array of results, a fusion result, or JSONL",
            ))
        }
        // Not a single JSON document: treat as JSONL.
        Err(_) => {
            let mut out = Vec::new();
            for (i, line) in text.lines().enumerate() {
                if line.trim().is_empty() {
                    continue;
                }
                let value: Value = serde_json::from_str(line).map_err(|e| {
                    CliError::new(EXIT_INPUT_PARSE, format!("line {}: invalid JSON: {e}", i + 1))
                })?;
                out.push((i + 1, value));
            }
            out
        }
    };

    records
        .into_iter()
        .map(|(n, value)| {
            let modality = parse_modality(&value).map_err(|e| {
                CliError::new(EXIT_INPUT_PARSE, format!("record {n}: {e}"))
            })?;
            Ok(sanitize(&value).into_result(modality))
        })
        .collect()
}

/// The record list of a fusion result or of a report wrapping one.
fn fused_records(obj: &Map<String, Value>) -> Option<&[Value]> {
    let fused = match obj.get("result") {
        Some(Value::Object(result)) => result,
        _ => obj,
    };
    fused.get("modalities")?.as_array().map(Vec::as_slice)
}

fn number(items: Vec<Value>) -> Vec<(usize, Value)> {
    items.into_iter().enumerate().map(|(i, v)| (i + 1, v)).collect()
}

/// The `modality` field of a record. Unlike the other fields it has no safe
/// default.
pub fn parse_modality(value: &Value) -> Result<Modality, String> {
    match value.get("modality") {
        Some(Value::String(s)) => {
            Modality::from_literal(s).ok_or_else(|| format!("unknown modality '{s}'"))
        }
        Some(_) => Err("'modality' must be a string".into()),
        None => Err("missing 'modality'".into()),
    }
}

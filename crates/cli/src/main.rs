// TruthLens CLI - headless sanitize / fuse / replay over the fusion engine

mod exit_codes;
mod input;
mod policy;
mod replay;
mod report;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use truthlens_fusion::{fuse, sanitize_output, score, Modality};

use exit_codes::{
    verdict_exit_code, EXIT_ERROR, EXIT_INPUT_IO, EXIT_INPUT_PARSE, EXIT_SUCCESS, EXIT_USAGE,
};
use policy::PolicyCommands;
use report::FusionReport;

#[derive(Parser)]
#[command(name = "tlens")]
#[command(about = "Sanitize content-analysis oracle output and fuse per-modality verdicts")]
#[command(long_version = long_version())]
#[command(version)]
#[command(subcommand_required = false)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Sanitize one raw oracle response into a canonical analysis result
    #[command(after_help = "\
Examples:
  tlens sanitize response.txt --modality image
  cat response.txt | tlens sanitize --modality text")]
    Sanitize {
        /// Raw oracle output (file path, or - / omitted for stdin)
        input: Option<PathBuf>,

        /// Modality the response belongs to
        #[arg(long, short = 'm')]
        modality: Modality,
    },

    /// Fuse a set of analysis results into one overall verdict
    #[command(after_help = "\
Examples:
  tlens fuse results.json
  tlens fuse results.jsonl --policy strict.toml --json
  tlens fuse results.json --strict-exit || echo \"not authentic\"")]
    Fuse {
        /// Results as a JSON array, a prior fusion result or fuse report, or JSONL (file, or - / omitted for stdin)
        input: Option<PathBuf>,

        /// Fusion policy TOML (defaults to the built-in weights)
        #[arg(long, env = "TRUTHLENS_POLICY")]
        policy: Option<PathBuf>,

        /// Output the JSON report to stdout
        #[arg(long)]
        json: bool,

        /// Write the JSON report to file
        #[arg(long)]
        output: Option<PathBuf>,

        /// Exit 3 for an overall fake verdict, 4 for suspicious
        #[arg(long)]
        strict_exit: bool,
    },

    /// Replay a JSONL transcript of oracle responses through a session
    #[command(after_help = "\
Examples:
  tlens replay transcript.jsonl
  tlens replay transcript.jsonl --json --strict-exit

Each line is {\"modality\": M, \"output\": \"...\"} or {\"modality\": M, \"error\": \"...\"}.")]
    Replay {
        /// Transcript file (or - / omitted for stdin)
        input: Option<PathBuf>,

        /// Fusion policy TOML (defaults to the built-in weights)
        #[arg(long, env = "TRUTHLENS_POLICY")]
        policy: Option<PathBuf>,

        /// Output the final JSON report to stdout
        #[arg(long)]
        json: bool,

        /// Exit 3 for an overall fake verdict, 4 for suspicious
        #[arg(long)]
        strict_exit: bool,
    },

    /// Inspect and validate fusion policies
    #[command(subcommand)]
    Policy(PolicyCommands),
}

fn long_version() -> &'static str {
    if cfg!(debug_assertions) {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("GIT_COMMIT_HASH"), ")",
            "\nengine:  truthlens-fusion ", env!("CARGO_PKG_VERSION"),
            "\nbuild:   debug",
            "\ntarget:  ", env!("TARGET"),
        )
    } else {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("GIT_COMMIT_HASH"), ")",
            "\nengine:  truthlens-fusion ", env!("CARGO_PKG_VERSION"),
            "\nbuild:   release",
            "\ntarget:  ", env!("TARGET"),
        )
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version also arrive here, on stdout.
            let code = if e.use_stderr() { EXIT_USAGE } else { EXIT_SUCCESS };
            let _ = e.print();
            return ExitCode::from(code);
        }
    };

    let result = match cli.command {
        None => {
            eprintln!("Usage: tlens <command> [options]");
            eprintln!("       tlens --help for more information");
            Ok(())
        }
        Some(Commands::Sanitize { input, modality }) => cmd_sanitize(input, modality),
        Some(Commands::Fuse { input, policy, json, output, strict_exit }) => {
            cmd_fuse(input, policy, json, output, strict_exit)
        }
        Some(Commands::Replay { input, policy, json, strict_exit }) => {
            replay::cmd_replay(input, policy, json, strict_exit)
        }
        Some(Commands::Policy(cmd)) => policy::cmd_policy(cmd),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn new(code: u8, msg: impl Into<String>) -> Self {
        Self { code, message: msg.into(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

// ============================================================================
// sanitize
// ============================================================================

fn cmd_sanitize(input: Option<PathBuf>, modality: Modality) -> Result<(), CliError> {
    let text = input::read_source(input.as_deref())?;
    let result = sanitize_output(&text).into_result(modality);

    let json = serde_json::to_string_pretty(&result)
        .map_err(|e| CliError::new(EXIT_ERROR, format!("JSON serialization error: {e}")))?;
    println!("{json}");
    Ok(())
}

// ============================================================================
// fuse
// ============================================================================

fn cmd_fuse(
    input: Option<PathBuf>,
    policy_path: Option<PathBuf>,
    json_output: bool,
    output_file: Option<PathBuf>,
    strict_exit: bool,
) -> Result<(), CliError> {
    let (policy, policy_label) = input::load_policy(policy_path.as_ref())?;
    let text = input::read_source(input.as_deref())?;
    let results = input::parse_results(&text)?;
    log::info!("fusing {} result(s) with policy {}", results.len(), policy_label);

    let (Some(score), Some(result)) = (score(&results, &policy), fuse(&results, &policy)) else {
        return Err(CliError::new(EXIT_INPUT_PARSE, "no analysis results to fuse")
            .with_hint("input must contain at least one record with a 'modality' field"));
    };

    let report = FusionReport::new(policy_label, score, result);
    let json_str = report.to_json()?;

    if let Some(ref path) = output_file {
        std::fs::write(path, &json_str).map_err(|e| {
            CliError::new(EXIT_INPUT_IO, format!("cannot write {}: {e}", path.display()))
        })?;
        eprintln!("wrote {}", path.display());
    }

    if json_output {
        println!("{json_str}");
    }

    eprintln!("{}", report.summary_line());

    if strict_exit {
        let code = verdict_exit_code(report.result.overall_verdict);
        if code != EXIT_SUCCESS {
            return Err(CliError::new(code, String::new()));
        }
    }
    Ok(())
}

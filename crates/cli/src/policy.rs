use std::path::PathBuf;

use clap::Subcommand;
use truthlens_fusion::FusionPolicy;

use crate::exit_codes::{policy_exit_code, EXIT_ERROR};
use crate::input::load_policy;
use crate::CliError;

#[derive(Subcommand)]
pub enum PolicyCommands {
    /// Print the effective fusion policy as TOML
    #[command(after_help = "\
Examples:
  tlens policy show
  tlens policy show --policy strict.toml
  tlens policy show > my-policy.toml")]
    Show {
        /// Policy TOML to show instead of the built-in default
        #[arg(long, env = "TRUTHLENS_POLICY")]
        policy: Option<PathBuf>,
    },

    /// Validate a fusion policy file without fusing anything
    #[command(after_help = "\
Examples:
  tlens policy validate strict.toml")]
    Validate {
        /// Path to the policy TOML
        policy: PathBuf,
    },
}

pub fn cmd_policy(cmd: PolicyCommands) -> Result<(), CliError> {
    match cmd {
        PolicyCommands::Show { policy } => cmd_policy_show(policy),
        PolicyCommands::Validate { policy } => cmd_policy_validate(policy),
    }
}

fn cmd_policy_show(path: Option<PathBuf>) -> Result<(), CliError> {
    let (policy, label) = load_policy(path.as_ref())?;
    let toml = policy
        .to_toml()
        .map_err(|e| CliError::new(EXIT_ERROR, e.to_string()))?;
    println!("# fusion policy: {label}");
    print!("{toml}");
    Ok(())
}

fn cmd_policy_validate(path: PathBuf) -> Result<(), CliError> {
    match FusionPolicy::load(&path) {
        Ok(policy) => {
            let w = &policy.weights;
            eprintln!(
                "valid: weights text={} url={} image={} video={} document={} audio={}; fake below {}, suspicious below {}",
                w.text,
                w.url,
                w.image,
                w.video,
                w.document,
                w.audio,
                policy.thresholds.fake_below,
                policy.thresholds.suspicious_below,
            );
            Ok(())
        }
        Err(e) => Err(CliError::new(policy_exit_code(&e), e.to_string())
            .with_hint("run `tlens policy show` for a complete default policy")),
    }
}

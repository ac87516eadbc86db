//! Config validation CLI tool
//!
//! Validates a timebank configuration file and reports any errors.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use timebank_config::{BudgetScope, ConfigError, CURRENT_CONFIG_VERSION};
use timebank_util::{default_config_path, format_duration};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Validate a timebank configuration file
#[derive(Parser, Debug)]
#[command(name = "validate-config")]
#[command(about = "Validates a timebank configuration file", long_about = None)]
struct Args {
    /// Configuration file path (or set TIMEBANK_CONFIG env var)
    #[arg(default_value_os_t = default_config_path())]
    config: PathBuf,

    /// Log level
    #[arg(short, long, default_value = "warn")]
    log_level: String,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if !args.config.exists() {
        eprintln!("Error: Configuration file not found: {}", args.config.display());
        return ExitCode::from(1);
    }

    debug!(config_path = %args.config.display(), "Validating configuration");

    match timebank_config::load_config(&args.config) {
        Ok(policy) => {
            let supervisor = &policy.supervisor;
            let scope = match supervisor.scope {
                BudgetScope::PerPrincipal => "per principal (cumulative)",
                BudgetScope::PerRequest => "per request",
            };

            println!("✓ Configuration is valid");
            println!();
            println!("Summary:");
            println!("  Config version: {}", CURRENT_CONFIG_VERSION);
            println!("  Limit: {}", format_duration(supervisor.limit));
            println!("  Quantum: {}", format_duration(supervisor.quantum));
            println!("  Scope: {}", scope);
            println!("  Principals: {}", policy.principals.len());

            if !policy.principals.is_empty() {
                println!();
                println!("Principals:");
                for principal in &policy.principals {
                    let tier = if principal.premium { "premium" } else { "metered" };
                    println!(
                        "  - {} [{}]: {} used",
                        principal.id,
                        tier,
                        format_duration(principal.initial_used)
                    );
                }
            }

            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("✗ Configuration validation failed");
            eprintln!();
            match &e {
                ConfigError::ReadError(io_err) => {
                    eprintln!("Failed to read file: {}", io_err);
                }
                ConfigError::ParseError(parse_err) => {
                    eprintln!("TOML parse error:");
                    eprintln!("  {}", parse_err);
                }
                ConfigError::ValidationFailed { errors } => {
                    eprintln!("Validation errors ({}):", errors.len());
                    for err in errors {
                        eprintln!("  - {}", err);
                    }
                }
                ConfigError::UnsupportedVersion(ver) => {
                    eprintln!(
                        "Unsupported config version: {} (expected {})",
                        ver, CURRENT_CONFIG_VERSION
                    );
                }
            }
            ExitCode::from(1)
        }
    }
}

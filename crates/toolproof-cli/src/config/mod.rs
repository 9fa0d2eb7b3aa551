//! CLI configuration management.
//!
//! This module defines the CLI configuration hierarchy:
//!
//! ```text
//! Cli
//! ├── logging: LoggingConfig      # Log output format
//! └── command: Command
//!     ├── resolve: ResolveArgs    # Pool, resolver and report options
//!     └── compile: CompileArgs    # Pool, resolver and binding options
//! ```
//!
//! All options can be provided via CLI arguments or `TOOLPROOF_*` environment
//! variables. Use `--help` to see all available options.
//!
//! # Example
//!
//! ```bash
//! toolproof resolve --input pool.json --policy most_recent
//!
//! # Or via environment variables
//! TOOLPROOF_INPUT=pool.json TOOLPROOF_FORMAT=summary toolproof resolve
//! ```

mod logging;
mod pool;

use std::process;

use clap::{Args, Parser, Subcommand};
pub use logging::{LogFormat, LoggingConfig};
pub use pool::PoolArgs;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};

use crate::TRACING_TARGET_CONFIG;

/// Complete CLI configuration.
#[derive(Debug, Clone, Parser, Serialize, Deserialize)]
#[command(name = "toolproof")]
#[command(about = "Resolve job pools into scheduled workflows")]
#[command(version)]
pub struct Cli {
    /// Logging configuration.
    #[clap(flatten)]
    pub logging: LoggingConfig,

    /// Command to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Clone, Subcommand, Serialize, Deserialize)]
pub enum Command {
    /// Resolve a job pool and report levels, layout and socket orders.
    Resolve(ResolveArgs),
    /// Resolve a job pool and compile every workflow into step bindings.
    Compile(CompileArgs),
}

/// Report format of the `resolve` command.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[derive(clap::ValueEnum, AsRefStr, Display)]
#[derive(Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Pretty printed JSON.
    #[default]
    Json,
    /// Plain text, one line per workflow node.
    Summary,
}

/// Options of the `resolve` command.
#[derive(Debug, Clone, Args, Serialize, Deserialize)]
pub struct ResolveArgs {
    /// Job pool and resolver options.
    #[clap(flatten)]
    pub pool: PoolArgs,

    /// Report format.
    #[arg(long, env = "TOOLPROOF_FORMAT", value_enum, default_value_t = OutputFormat::Json)]
    #[serde(default)]
    pub format: OutputFormat,
}

/// Options of the `compile` command.
#[derive(Debug, Clone, Args, Serialize, Deserialize)]
pub struct CompileArgs {
    /// Job pool and resolver options.
    #[clap(flatten)]
    pub pool: PoolArgs,

    /// Prefix of generated resource paths.
    #[arg(long, env = "TOOLPROOF_NAMESPACE", default_value = "workflow")]
    pub namespace: String,

    /// JSON file mapping job ids to manual input and output bindings.
    #[arg(long, env = "TOOLPROOF_BINDINGS")]
    pub bindings: Option<std::path::PathBuf>,
}

impl Cli {
    /// Loads environment variables from .env file (if enabled) and parses CLI arguments.
    ///
    /// The .env file is loaded before clap parses arguments, so its variables
    /// act as defaults for every `env` backed option.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    /// Loads environment variables from .env file if the dotenv feature is enabled.
    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }

    /// No-op when dotenv feature is disabled.
    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}

    /// Logs build information and the parsed configuration at debug level.
    pub fn log(&self) {
        tracing::debug!(
            target: TRACING_TARGET_CONFIG,
            version = env!("CARGO_PKG_VERSION"),
            pid = process::id(),
            arch = std::env::consts::ARCH,
            os = std::env::consts::OS,
            features = ?Self::enabled_features(),
            "Build information"
        );

        match &self.command {
            Command::Resolve(args) => {
                args.pool.log();
                tracing::debug!(
                    target: TRACING_TARGET_CONFIG,
                    format = %args.format,
                    "Resolve configuration"
                );
            }
            Command::Compile(args) => {
                args.pool.log();
                tracing::debug!(
                    target: TRACING_TARGET_CONFIG,
                    namespace = %args.namespace,
                    bindings = ?args.bindings,
                    "Compile configuration"
                );
            }
        }
    }

    /// Returns a list of enabled compile-time features.
    fn enabled_features() -> Vec<&'static str> {
        [cfg!(feature = "dotenv").then_some("dotenv")]
            .into_iter()
            .flatten()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_resolve() {
        let cli = Cli::try_parse_from([
            "toolproof",
            "resolve",
            "--input",
            "pool.json",
            "--policy",
            "reject",
            "--format",
            "summary",
        ])
        .unwrap();

        let Command::Resolve(args) = cli.command else {
            panic!("expected resolve command");
        };
        assert_eq!(args.format, OutputFormat::Summary);
        assert_eq!(args.pool.policy.to_string(), "reject");
        assert!(!args.pool.strict_roles);
    }

    #[test]
    fn test_parse_compile_defaults() {
        let cli =
            Cli::try_parse_from(["toolproof", "compile", "--input", "pool.json"]).unwrap();

        let Command::Compile(args) = cli.command else {
            panic!("expected compile command");
        };
        assert_eq!(args.namespace, "workflow");
        assert!(args.bindings.is_none());
        assert_eq!(cli.logging.log_format, LogFormat::Pretty);
    }
}

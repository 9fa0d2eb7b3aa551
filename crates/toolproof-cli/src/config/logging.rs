//! Logging configuration.

use std::io;

use clap::Args;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Format of log lines written to stderr.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[derive(clap::ValueEnum, AsRefStr, Display)]
#[derive(Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human readable lines.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

/// Logging options.
///
/// Filtering follows `RUST_LOG` and defaults to `info`.
#[derive(Debug, Clone, Args, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Format of log lines.
    #[arg(long, global = true, env = "TOOLPROOF_LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    #[serde(default)]
    pub log_format: LogFormat,
}

impl LoggingConfig {
    /// Initializes tracing with environment-based filtering.
    ///
    /// Logs go to stderr so that stdout only carries command output.
    pub fn init_tracing(&self) {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let json = self.log_format == LogFormat::Json;

        tracing_subscriber::registry()
            .with(filter)
            .with(json.then(|| tracing_subscriber::fmt::layer().json().with_writer(io::stderr)))
            .with((!json).then(|| tracing_subscriber::fmt::layer().with_writer(io::stderr)))
            .init();
    }
}

//! Command implementations.

mod compile;
mod resolve;

use std::io::{self, Write};

use anyhow::Context;
pub use compile::compile;
pub use resolve::resolve;
use serde::Serialize;
use toolproof_workflow::resolve::{Resolution, Resolver};

use crate::config::PoolArgs;

/// Loads the pool described by `args` and resolves it.
fn load_and_resolve(args: &PoolArgs) -> anyhow::Result<Resolution> {
    let pool = args.load_pool()?;
    let registry = args.load_registry()?;

    Resolver::with_config(&registry, args.resolver_config())
        .resolve(pool)
        .context("failed to resolve job pool")
}

/// Writes `value` to stdout as pretty printed JSON.
fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value).context("failed to write output")?;
    writeln!(stdout).context("failed to write output")?;
    Ok(())
}

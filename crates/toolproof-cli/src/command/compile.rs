//! The `compile` command.

use std::collections::BTreeMap;
use std::fs;

use anyhow::Context;
use toolproof_workflow::compile::{CompileOptions, ManualBindings, compile_workflow};
use toolproof_workflow::job::JobId;
use toolproof_workflow::schedule::compute_execution_levels;

use super::{load_and_resolve, print_json};
use crate::TRACING_TARGET_CLI;
use crate::config::CompileArgs;

/// Resolves the pool and prints the compiled step bindings of every workflow.
pub fn compile(args: &CompileArgs) -> anyhow::Result<()> {
    let options = CompileOptions {
        namespace: args.namespace.clone(),
        manual_bindings: load_bindings(args)?,
    };
    let resolution = load_and_resolve(&args.pool)?;

    let compiled = resolution
        .workflows
        .iter()
        .map(|workflow| {
            let levels =
                compute_execution_levels(workflow).context("failed to schedule workflow")?;
            compile_workflow(workflow, &levels, &options).context("failed to compile workflow")
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    tracing::info!(
        target: TRACING_TARGET_CLI,
        workflows = compiled.len(),
        steps = compiled.iter().map(|c| c.steps.len()).sum::<usize>(),
        "Compilation complete"
    );

    print_json(&compiled)
}

fn load_bindings(args: &CompileArgs) -> anyhow::Result<BTreeMap<JobId, ManualBindings>> {
    let Some(path) = &args.bindings else {
        return Ok(BTreeMap::new());
    };

    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read bindings {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("invalid bindings {}", path.display()))
}

//! The `resolve` command.

use std::collections::BTreeMap;
use std::io::{self, Write};

use anyhow::Context;
use jiff::Timestamp;
use serde::Serialize;
use toolproof_workflow::graph::Workflow;
use toolproof_workflow::job::{JobId, Role};
use toolproof_workflow::resolve::Diagnostic;
use toolproof_workflow::schedule::{
    ExecutionLevels, Layout, LayoutConfig, NodePlacement, SocketOrderOptimizer,
    compute_execution_levels,
};

use super::{load_and_resolve, print_json};
use crate::TRACING_TARGET_CLI;
use crate::config::{OutputFormat, ResolveArgs};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ResolveReport<'a> {
    resolved_at: Timestamp,
    diagnostics: &'a [Diagnostic],
    workflows: Vec<WorkflowReport<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WorkflowReport<'a> {
    workflow: &'a Workflow,
    levels: ExecutionLevels,
    layout: Vec<NodePlacement>,
    socket_orders: BTreeMap<JobId, Vec<Role>>,
}

impl<'a> WorkflowReport<'a> {
    fn new(workflow: &'a Workflow) -> anyhow::Result<Self> {
        let levels = compute_execution_levels(workflow).context("failed to schedule workflow")?;
        let layout = Layout::compute(workflow, &levels, LayoutConfig::default())
            .context("failed to lay out workflow")?;
        let socket_orders = SocketOrderOptimizer::new(workflow, &layout)
            .all_orders()
            .context("failed to order input sockets")?
            .into_iter()
            .collect();

        Ok(Self {
            workflow,
            levels,
            layout: layout.placements().to_vec(),
            socket_orders,
        })
    }
}

/// Resolves the pool and prints levels, layout and socket orders.
pub fn resolve(args: &ResolveArgs) -> anyhow::Result<()> {
    let resolution = load_and_resolve(&args.pool)?;

    let workflows = resolution
        .workflows
        .iter()
        .map(WorkflowReport::new)
        .collect::<anyhow::Result<Vec<_>>>()?;

    tracing::info!(
        target: TRACING_TARGET_CLI,
        workflows = workflows.len(),
        diagnostics = resolution.diagnostics.len(),
        "Resolution complete"
    );

    let report = ResolveReport {
        resolved_at: resolution.resolved_at,
        diagnostics: &resolution.diagnostics,
        workflows,
    };

    match args.format {
        OutputFormat::Json => print_json(&report),
        OutputFormat::Summary => print_summary(&report),
    }
}

fn print_summary(report: &ResolveReport<'_>) -> anyhow::Result<()> {
    let mut out = io::stdout().lock();

    for diagnostic in report.diagnostics {
        writeln!(out, "! {} {}", diagnostic.kind(), diagnostic.job_id())?;
    }

    for (index, workflow) in report.workflows.iter().enumerate() {
        writeln!(
            out,
            "workflow {} ({} nodes, {} edges)",
            index + 1,
            workflow.workflow.node_count(),
            workflow.workflow.edge_count()
        )?;

        for (level, wave) in workflow.levels.waves().iter().enumerate() {
            for id in wave {
                let Some(node) = workflow.workflow.node(id) else {
                    continue;
                };
                let marker = if node.is_synthetic { "*" } else { " " };
                let inputs = workflow
                    .socket_orders
                    .get(id)
                    .map(|roles| join(roles))
                    .unwrap_or_default();
                writeln!(
                    out,
                    "  {level} {marker} {} [{inputs}] -> [{}]",
                    node.job.display_name,
                    join(&node.job.outputs)
                )?;
            }
        }
    }

    Ok(())
}

fn join(roles: &[Role]) -> String {
    roles
        .iter()
        .map(Role::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

//! Resolution of job pools into workflows.
//!
//! This module wires an unordered pool of [`Job`]s into connected
//! [`Workflow`]s:
//! - [`Resolver`]: the entry point, bound to a [`ResourceTypeRegistry`]
//! - [`ResolverConfig`]: producer tie-break and role checking options
//! - [`Resolution`]: resulting workflows with [`Diagnostic`]s

mod config;
mod diagnostic;
mod partition;
mod policy;
mod wirer;

use std::sync::Arc;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

pub use config::{ResolverConfig, ResolverConfigBuilder, ResolverConfigError};
pub use diagnostic::Diagnostic;
pub use policy::ProducerPolicy;

use partition::WorkflowPartitioner;
use wirer::GraphAutoWirer;

use crate::TRACING_TARGET_RESOLVE;
use crate::error::WorkflowResult;
use crate::graph::Workflow;
use crate::job::{Job, ensure_unique_ids};
use crate::registry::ResourceTypeRegistry;

/// Outcome of resolving one job pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolution {
    /// Connected workflows, in construction order.
    pub workflows: Vec<Workflow>,
    /// Fallbacks taken while partitioning.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
    /// When the resolution finished.
    pub resolved_at: Timestamp,
}

impl Resolution {
    /// Returns whether partitioning had to fall back at least once.
    pub fn has_diagnostics(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

/// Resolves job pools against a resource type registry.
#[derive(Debug, Clone)]
pub struct Resolver<'a> {
    registry: &'a ResourceTypeRegistry,
    config: ResolverConfig,
}

impl<'a> Resolver<'a> {
    /// Creates a resolver with the default configuration.
    pub fn new(registry: &'a ResourceTypeRegistry) -> Self {
        Self::with_config(registry, ResolverConfig::default())
    }

    /// Creates a resolver with a custom configuration.
    pub fn with_config(registry: &'a ResourceTypeRegistry, config: ResolverConfig) -> Self {
        Self { registry, config }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolves `jobs` into connected workflows.
    ///
    /// Every job appears in exactly one workflow. Inputs that no job of the
    /// pool produces are fed by synthetic `load_<role>` sources.
    ///
    /// # Errors
    ///
    /// Fails on duplicate job ids, on roles unknown to the registry when
    /// strict roles are enabled, and on shared roles under
    /// [`ProducerPolicy::Reject`].
    pub fn resolve(&self, jobs: impl IntoIterator<Item = Job>) -> WorkflowResult<Resolution> {
        let pool: Vec<Arc<Job>> = jobs.into_iter().map(Arc::new).collect();
        ensure_unique_ids(pool.iter().map(|job| &**job))?;

        if self.config.strict_roles {
            for job in &pool {
                job.validate_roles(self.registry)?;
            }
        }

        tracing::debug!(
            target: TRACING_TARGET_RESOLVE,
            jobs = pool.len(),
            policy = %self.config.producer_policy,
            "Resolving job pool",
        );

        let (workflows, diagnostics) =
            WorkflowPartitioner::new(self.config.producer_policy).partition(&pool)?;

        tracing::info!(
            target: TRACING_TARGET_RESOLVE,
            jobs = pool.len(),
            workflows = workflows.len(),
            diagnostics = diagnostics.len(),
            "Job pool resolved",
        );

        Ok(Resolution {
            workflows,
            diagnostics,
            resolved_at: Timestamp::now(),
        })
    }
}

/// Resolves `jobs` with the default configuration and returns the workflows.
pub fn resolve_workflows(
    jobs: impl IntoIterator<Item = Job>,
    registry: &ResourceTypeRegistry,
) -> WorkflowResult<Vec<Workflow>> {
    Resolver::new(registry)
        .resolve(jobs)
        .map(|resolution| resolution.workflows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WorkflowError;

    #[test]
    fn test_duplicate_ids_fail_fast() {
        let registry = ResourceTypeRegistry::new();
        let jobs = vec![Job::new("a", "first"), Job::new("a", "second")];

        let error = resolve_workflows(jobs, &registry).unwrap_err();
        assert!(matches!(error, WorkflowError::DuplicateJobId { job_id } if job_id.as_str() == "a"));
    }

    #[test]
    fn test_strict_roles() {
        let mut registry = ResourceTypeRegistry::with_defaults();
        registry.define("sum", "Sum of two numbers", "json");

        let config = ResolverConfig::builder()
            .with_strict_roles(true)
            .build()
            .unwrap();
        let resolver = Resolver::with_config(&registry, config);

        let add = Job::new("add", "add")
            .with_inputs(["number", "number"])
            .with_outputs(["sum"]);
        assert!(resolver.resolve([add.clone()]).is_ok());

        let bad = Job::new("neg", "negate").with_inputs(["vector"]);
        let error = resolver.resolve([add, bad]).unwrap_err();
        assert!(matches!(error, WorkflowError::ResourceTypeNotFound { name } if name == "vector"));
    }

    #[test]
    fn test_lenient_roles_by_default() {
        let registry = ResourceTypeRegistry::new();
        let job = Job::new("neg", "negate").with_inputs(["vector"]);

        let resolution = Resolver::new(&registry).resolve([job]).unwrap();
        assert_eq!(resolution.workflows.len(), 1);
        assert!(!resolution.has_diagnostics());
    }

    #[test]
    fn test_resolution_serialization() {
        let registry = ResourceTypeRegistry::new();
        let job = Job::new("a", "a").with_outputs(["x"]);

        let resolution = Resolver::new(&registry).resolve([job]).unwrap();
        let json = serde_json::to_value(&resolution).unwrap();

        assert!(json["resolvedAt"].is_string());
        assert!(json.get("diagnostics").is_none());
        assert_eq!(json["workflows"][0]["nodes"][0]["job"]["id"], "a");
    }
}

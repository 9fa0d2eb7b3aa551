//! Job pool loading options.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use serde::{Deserialize, Serialize};
use toolproof_workflow::job::JobPool;
use toolproof_workflow::registry::{ResourceTypeDef, ResourceTypeRegistry};
use toolproof_workflow::resolve::{ProducerPolicy, ResolverConfig};

use crate::TRACING_TARGET_CONFIG;

/// Where to read the job pool from and how to resolve it.
#[derive(Debug, Clone, Args, Serialize, Deserialize)]
pub struct PoolArgs {
    /// Job pool document, either versioned or a bare array of jobs.
    #[arg(short, long, env = "TOOLPROOF_INPUT")]
    pub input: PathBuf,

    /// JSON array of resource type definitions; the built-in number and
    /// character types are used when omitted.
    #[arg(long, env = "TOOLPROOF_REGISTRY")]
    pub registry: Option<PathBuf>,

    /// Tie-break between several producers of one role.
    #[arg(long, env = "TOOLPROOF_POLICY", default_value_t = ProducerPolicy::FirstRegistered)]
    #[serde(default)]
    pub policy: ProducerPolicy,

    /// Reject job roles that are not defined in the registry.
    #[arg(long, env = "TOOLPROOF_STRICT_ROLES")]
    #[serde(default)]
    pub strict_roles: bool,
}

impl PoolArgs {
    /// Reads and parses the job pool document.
    pub fn load_pool(&self) -> anyhow::Result<JobPool> {
        let json = fs::read_to_string(&self.input)
            .with_context(|| format!("failed to read job pool {}", self.input.display()))?;
        JobPool::from_json(&json)
            .with_context(|| format!("invalid job pool {}", self.input.display()))
    }

    /// Builds the resource type registry.
    pub fn load_registry(&self) -> anyhow::Result<ResourceTypeRegistry> {
        let mut registry = ResourceTypeRegistry::with_defaults();
        let Some(path) = &self.registry else {
            return Ok(registry);
        };

        let json = fs::read_to_string(path)
            .with_context(|| format!("failed to read registry {}", path.display()))?;
        let defs: Vec<ResourceTypeDef> = serde_json::from_str(&json)
            .with_context(|| format!("invalid registry {}", path.display()))?;
        registry.define_many(defs);

        Ok(registry)
    }

    /// Returns the resolver configuration.
    pub fn resolver_config(&self) -> ResolverConfig {
        ResolverConfig {
            producer_policy: self.policy,
            strict_roles: self.strict_roles,
        }
    }

    /// Logs the options.
    pub fn log(&self) {
        tracing::debug!(
            target: TRACING_TARGET_CONFIG,
            input = %self.input.display(),
            registry = ?self.registry,
            policy = %self.policy,
            strict_roles = self.strict_roles,
            "Pool configuration"
        );
    }
}

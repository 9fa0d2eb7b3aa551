//! Workflow node.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::job::{Job, JobId};

/// A job placed in a workflow.
///
/// Nodes share their job read-only; the node id is the job id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowNode {
    /// The wrapped job.
    pub job: Arc<Job>,
    /// Whether the job is a generated `load_<role>` source.
    #[serde(default)]
    pub is_synthetic: bool,
}

impl WorkflowNode {
    /// Wraps a job from the pool.
    pub fn new(job: impl Into<Arc<Job>>) -> Self {
        Self {
            job: job.into(),
            is_synthetic: false,
        }
    }

    /// Wraps a generated source job.
    pub fn synthetic(job: impl Into<Arc<Job>>) -> Self {
        Self {
            job: job.into(),
            is_synthetic: true,
        }
    }

    /// Returns the node id.
    #[inline]
    pub fn id(&self) -> &JobId {
        &self.job.id
    }
}

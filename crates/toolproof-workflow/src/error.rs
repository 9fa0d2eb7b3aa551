//! Workflow error types.

use thiserror::Error;

use crate::job::{JobId, Role};

/// Result type for workflow operations.
pub type WorkflowResult<T> = Result<T, WorkflowError>;

/// Errors that can occur while resolving, scheduling or compiling workflows.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// A resource type was looked up before being defined.
    #[error("resource type '{name}' not found in registry, did you forget to define it?")]
    ResourceTypeNotFound {
        /// Display name that was requested.
        name: String,
    },

    /// The same job id appears more than once in a job pool.
    #[error("duplicate job id: {job_id}")]
    DuplicateJobId {
        /// The repeated job id.
        job_id: JobId,
    },

    /// A second producer was registered for a role under the `reject` policy.
    #[error("role '{role}' is produced by both {existing} and {candidate}")]
    AmbiguousProducer {
        /// The contested role.
        role: Role,
        /// Producer registered first.
        existing: JobId,
        /// Producer that was rejected.
        candidate: JobId,
    },

    /// A consumer input has no producer after source synthesis.
    #[error("input '{role}' of node {node_id} has no producer")]
    UnresolvedInput {
        /// Consuming node.
        node_id: JobId,
        /// Role without a producer.
        role: Role,
    },

    /// The scheduler found nodes that are part of a cycle.
    #[error("cycle detected in workflow graph involving {}", format_ids(.nodes))]
    CyclicSubgraph {
        /// Nodes of every cyclic strongly connected component.
        nodes: Vec<JobId>,
    },

    /// A node id does not belong to the workflow.
    #[error("node not found: {0}")]
    NodeNotFound(JobId),

    /// A workflow or job pool is structurally invalid.
    #[error("invalid workflow definition: {0}")]
    InvalidDefinition(String),

    /// A job pool document uses an unsupported schema version.
    #[error("unsupported job pool schema version {found}, expected {expected}")]
    UnsupportedSchemaVersion {
        /// Version found in the document.
        found: semver::Version,
        /// Version supported by this crate.
        expected: semver::Version,
    },

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

fn format_ids(ids: &[JobId]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cyclic_subgraph_message() {
        let error = WorkflowError::CyclicSubgraph {
            nodes: vec![JobId::from("d"), JobId::from("e")],
        };
        assert_eq!(
            error.to_string(),
            "cycle detected in workflow graph involving d, e"
        );
    }

    #[test]
    fn test_not_found_message() {
        let error = WorkflowError::ResourceTypeNotFound {
            name: "ligand".into(),
        };
        assert!(error.to_string().contains("'ligand'"));
    }
}

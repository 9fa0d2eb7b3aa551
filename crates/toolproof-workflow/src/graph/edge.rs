//! Workflow edge.

use serde::{Deserialize, Serialize};

use crate::job::{JobId, Role};

/// A producer-to-consumer connection carrying one or more roles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowEdge {
    /// Producing node.
    pub from: JobId,
    /// Consuming node.
    pub to: JobId,
    /// Roles flowing along this edge, in the order they were matched.
    pub data_flow: Vec<Role>,
}

impl WorkflowEdge {
    /// Creates an edge carrying a single role.
    pub fn new(from: impl Into<JobId>, to: impl Into<JobId>, role: impl Into<Role>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            data_flow: vec![role.into()],
        }
    }

    /// Returns whether this edge carries `role`.
    pub fn carries(&self, role: &Role) -> bool {
        self.data_flow.contains(role)
    }

    /// Adds a role unless the edge already carries it.
    pub fn push_role(&mut self, role: Role) {
        if !self.carries(&role) {
            self.data_flow.push(role);
        }
    }

    /// Returns whether this edge connects `from` to `to`.
    pub fn connects(&self, from: &JobId, to: &JobId) -> bool {
        &self.from == from && &self.to == to
    }
}

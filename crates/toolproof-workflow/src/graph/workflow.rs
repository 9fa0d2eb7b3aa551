//! Workflow graph.

use std::collections::{HashMap, HashSet};

use petgraph::algo::connected_components;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};

use super::{WorkflowEdge, WorkflowNode};
use crate::error::{WorkflowError, WorkflowResult};
use crate::job::{JobId, Role};

/// A connected graph of workflow nodes and edges.
///
/// Node order is construction order; it drives level grouping, layout and
/// compilation, so it is preserved through serialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Workflow {
    /// Nodes in construction order.
    nodes: Vec<WorkflowNode>,
    /// Edges, at most one per ordered node pair.
    edges: Vec<WorkflowEdge>,
}

impl Workflow {
    /// Creates a new empty workflow.
    pub fn new() -> Self {
        Self::default()
    }

    /// Assembles a workflow without checking it; see [`Workflow::validate`].
    pub fn from_parts(nodes: Vec<WorkflowNode>, edges: Vec<WorkflowEdge>) -> Self {
        Self { nodes, edges }
    }

    /// Splits the workflow into its nodes and edges.
    pub fn into_parts(self) -> (Vec<WorkflowNode>, Vec<WorkflowEdge>) {
        (self.nodes, self.edges)
    }

    /// Returns the number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns whether the workflow has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Adds a node, rejecting ids already present.
    pub fn add_node(&mut self, node: WorkflowNode) -> WorkflowResult<()> {
        if self.contains_node(node.id()) {
            return Err(WorkflowError::DuplicateJobId {
                job_id: node.id().clone(),
            });
        }
        self.nodes.push(node);
        Ok(())
    }

    /// Adds an edge, merging its roles into an existing edge between the same
    /// ordered pair.
    pub fn add_edge(&mut self, edge: WorkflowEdge) -> WorkflowResult<()> {
        if !self.contains_node(&edge.from) {
            return Err(WorkflowError::InvalidDefinition(format!(
                "source node {} does not exist",
                edge.from
            )));
        }
        if !self.contains_node(&edge.to) {
            return Err(WorkflowError::InvalidDefinition(format!(
                "target node {} does not exist",
                edge.to
            )));
        }

        match self.edges.iter_mut().find(|e| e.connects(&edge.from, &edge.to)) {
            Some(existing) => edge
                .data_flow
                .into_iter()
                .for_each(|role| existing.push_role(role)),
            None => self.edges.push(edge),
        }
        Ok(())
    }

    /// Returns the nodes in construction order.
    pub fn nodes(&self) -> &[WorkflowNode] {
        &self.nodes
    }

    /// Returns the edges.
    pub fn edges(&self) -> &[WorkflowEdge] {
        &self.edges
    }

    /// Returns a node by id.
    pub fn node(&self, id: &JobId) -> Option<&WorkflowNode> {
        self.nodes.iter().find(|node| node.id() == id)
    }

    /// Returns whether a node exists.
    pub fn contains_node(&self, id: &JobId) -> bool {
        self.node(id).is_some()
    }

    /// Returns edges originating from a node.
    pub fn outgoing_edges<'a, 'b>(
        &'a self,
        id: &'b JobId,
    ) -> impl Iterator<Item = &'a WorkflowEdge> + use<'a, 'b> {
        self.edges.iter().filter(move |e| &e.from == id)
    }

    /// Returns edges targeting a node.
    pub fn incoming_edges<'a, 'b>(
        &'a self,
        id: &'b JobId,
    ) -> impl Iterator<Item = &'a WorkflowEdge> + use<'a, 'b> {
        self.edges.iter().filter(move |e| &e.to == id)
    }

    /// Returns the edge delivering `role` to node `to`, if any.
    pub fn edge_delivering(&self, to: &JobId, role: &Role) -> Option<&WorkflowEdge> {
        self.incoming_edges(to).find(|e| e.carries(role))
    }

    /// Returns nodes with no incoming edges.
    pub fn source_nodes(&self) -> Vec<&WorkflowNode> {
        self.nodes
            .iter()
            .filter(|node| !self.edges.iter().any(|e| &e.to == node.id()))
            .collect()
    }

    /// Returns nodes with no outgoing edges.
    pub fn sink_nodes(&self) -> Vec<&WorkflowNode> {
        self.nodes
            .iter()
            .filter(|node| !self.edges.iter().any(|e| &e.from == node.id()))
            .collect()
    }

    /// Returns the generated source nodes.
    pub fn synthetic_nodes(&self) -> impl Iterator<Item = &WorkflowNode> {
        self.nodes.iter().filter(|node| node.is_synthetic)
    }

    /// Returns the ids of nodes wrapping pool jobs.
    pub fn job_ids(&self) -> impl Iterator<Item = &JobId> {
        self.nodes
            .iter()
            .filter(|node| !node.is_synthetic)
            .map(WorkflowNode::id)
    }

    /// Projects the workflow into a petgraph graph weighted by node ids and
    /// edge roles. Edges with unknown endpoints are skipped.
    pub fn to_graph(&self) -> (DiGraph<JobId, Vec<Role>>, HashMap<JobId, NodeIndex>) {
        let mut graph = DiGraph::with_capacity(self.nodes.len(), self.edges.len());
        let mut indices = HashMap::with_capacity(self.nodes.len());

        for node in &self.nodes {
            let index = graph.add_node(node.id().clone());
            indices.insert(node.id().clone(), index);
        }

        for edge in &self.edges {
            if let (Some(&from), Some(&to)) = (indices.get(&edge.from), indices.get(&edge.to)) {
                graph.add_edge(from, to, edge.data_flow.clone());
            }
        }

        (graph, indices)
    }

    /// Returns whether all nodes form a single weakly connected component.
    pub fn is_connected(&self) -> bool {
        if self.nodes.is_empty() {
            return true;
        }
        let (graph, _) = self.to_graph();
        connected_components(&graph) == 1
    }

    /// Validates the workflow structure.
    ///
    /// Checks that:
    /// - Node ids are unique
    /// - Every edge joins existing nodes and is the only edge for its pair
    /// - Every role on an edge is an output of its source and an input of its
    ///   target
    /// - Every input of every node is delivered by exactly one incoming edge
    /// - The workflow is a single connected component
    pub fn validate(&self) -> WorkflowResult<()> {
        let mut seen = HashSet::with_capacity(self.nodes.len());
        for node in &self.nodes {
            if !seen.insert(node.id()) {
                return Err(WorkflowError::DuplicateJobId {
                    job_id: node.id().clone(),
                });
            }
        }

        let mut pairs = HashSet::with_capacity(self.edges.len());
        for edge in &self.edges {
            let from = self
                .node(&edge.from)
                .ok_or_else(|| WorkflowError::NodeNotFound(edge.from.clone()))?;
            let to = self
                .node(&edge.to)
                .ok_or_else(|| WorkflowError::NodeNotFound(edge.to.clone()))?;

            if !pairs.insert((&edge.from, &edge.to)) {
                return Err(WorkflowError::InvalidDefinition(format!(
                    "duplicate edge from {} to {}",
                    edge.from, edge.to
                )));
            }

            for role in &edge.data_flow {
                if !from.job.produces(role) || !to.job.consumes(role) {
                    return Err(WorkflowError::InvalidDefinition(format!(
                        "edge from {} to {} carries '{role}' which is not an output of its source \
                         and an input of its target",
                        edge.from, edge.to
                    )));
                }
            }
        }

        for node in &self.nodes {
            for role in &node.job.inputs {
                match self.incoming_edges(node.id()).filter(|e| e.carries(role)).count() {
                    0 => {
                        return Err(WorkflowError::UnresolvedInput {
                            node_id: node.id().clone(),
                            role: role.clone(),
                        });
                    }
                    1 => {}
                    _ => {
                        return Err(WorkflowError::InvalidDefinition(format!(
                            "input '{role}' of node {} is delivered by several edges",
                            node.id()
                        )));
                    }
                }
            }
        }

        if !self.is_connected() {
            return Err(WorkflowError::InvalidDefinition(
                "workflow is not a single connected component".into(),
            ));
        }

        Ok(())
    }
}

//! Execution level assignment.

use std::collections::{HashMap, HashSet, VecDeque};

use petgraph::algo::tarjan_scc;
use serde::ser::{Serialize, Serializer};

use crate::TRACING_TARGET_SCHEDULE;
use crate::error::{WorkflowError, WorkflowResult};
use crate::graph::Workflow;
use crate::job::JobId;

/// Execution level of every node of a workflow.
///
/// A node's level is the length of the longest path reaching it from a
/// level-0 source. Nodes sharing a level may run in parallel, and every edge
/// points to a strictly higher level. Entries keep the workflow's node order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionLevels {
    entries: Vec<(JobId, usize)>,
    index: HashMap<JobId, usize>,
}

impl ExecutionLevels {
    /// Returns the level of a node.
    pub fn get(&self, id: &JobId) -> Option<usize> {
        self.index.get(id).map(|&i| self.entries[i].1)
    }

    /// Iterates over `(node, level)` pairs in node order.
    pub fn iter(&self) -> impl Iterator<Item = (&JobId, usize)> {
        self.entries.iter().map(|(id, level)| (id, *level))
    }

    /// Returns the number of nodes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether no node was leveled.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the highest level, if any node exists.
    pub fn max_level(&self) -> Option<usize> {
        self.entries.iter().map(|(_, level)| *level).max()
    }

    /// Groups nodes by level, each wave in node order.
    pub fn waves(&self) -> Vec<Vec<JobId>> {
        let mut waves = vec![Vec::new(); self.max_level().map_or(0, |max| max + 1)];
        for (id, level) in &self.entries {
            waves[*level].push(id.clone());
        }
        waves
    }
}

impl Serialize for ExecutionLevels {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

/// Assigns an execution level to every node of `workflow`.
///
/// Levels are computed with Kahn's algorithm over the workflow edges.
///
/// # Errors
///
/// Fails with [`WorkflowError::NodeNotFound`] when an edge references a node
/// outside the workflow, and with [`WorkflowError::CyclicSubgraph`] naming
/// every node that lies on a cycle.
pub fn compute_execution_levels(workflow: &Workflow) -> WorkflowResult<ExecutionLevels> {
    let nodes = workflow.nodes();
    let position: HashMap<&JobId, usize> = nodes
        .iter()
        .enumerate()
        .map(|(i, node)| (node.id(), i))
        .collect();

    let mut successors = vec![Vec::new(); nodes.len()];
    let mut in_degree = vec![0usize; nodes.len()];
    for edge in workflow.edges() {
        let from = *position
            .get(&edge.from)
            .ok_or_else(|| WorkflowError::NodeNotFound(edge.from.clone()))?;
        let to = *position
            .get(&edge.to)
            .ok_or_else(|| WorkflowError::NodeNotFound(edge.to.clone()))?;
        successors[from].push(to);
        in_degree[to] += 1;
    }

    let mut levels = vec![0usize; nodes.len()];
    let mut queue: VecDeque<usize> = (0..nodes.len()).filter(|&i| in_degree[i] == 0).collect();
    let mut visited = 0;

    while let Some(current) = queue.pop_front() {
        visited += 1;
        for &next in &successors[current] {
            levels[next] = levels[next].max(levels[current] + 1);
            in_degree[next] -= 1;
            if in_degree[next] == 0 {
                queue.push_back(next);
            }
        }
    }

    if visited < nodes.len() {
        let cyclic = cyclic_nodes(workflow);
        tracing::warn!(
            target: TRACING_TARGET_SCHEDULE,
            nodes = cyclic.len(),
            "Workflow contains a cycle",
        );
        return Err(WorkflowError::CyclicSubgraph { nodes: cyclic });
    }

    let entries: Vec<_> = nodes
        .iter()
        .zip(levels)
        .map(|(node, level)| (node.id().clone(), level))
        .collect();
    let index = entries
        .iter()
        .enumerate()
        .map(|(i, (id, _))| (id.clone(), i))
        .collect();

    let levels = ExecutionLevels { entries, index };
    tracing::debug!(
        target: TRACING_TARGET_SCHEDULE,
        nodes = levels.len(),
        max_level = ?levels.max_level(),
        "Execution levels computed",
    );

    Ok(levels)
}

/// Returns the nodes of every strongly connected component that forms a
/// cycle, in workflow node order.
fn cyclic_nodes(workflow: &Workflow) -> Vec<JobId> {
    let (graph, _) = workflow.to_graph();

    let cyclic: HashSet<&JobId> = tarjan_scc(&graph)
        .into_iter()
        .filter(|component| {
            component.len() > 1 || graph.contains_edge(component[0], component[0])
        })
        .flatten()
        .map(|index| &graph[index])
        .collect();

    workflow
        .nodes()
        .iter()
        .map(|node| node.id())
        .filter(|id| cyclic.contains(id))
        .cloned()
        .collect()
}

//! Level-based node placement.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::ExecutionLevels;
use crate::error::{WorkflowError, WorkflowResult};
use crate::graph::Workflow;
use crate::job::JobId;

/// Spacing used to turn levels and positions into coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    /// Distance between consecutive levels.
    pub horizontal_spacing: f64,
    /// Distance between consecutive positions within a level.
    pub vertical_spacing: f64,
    /// Distance between consecutive sockets of one node.
    pub socket_spacing: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            horizontal_spacing: 15.0,
            vertical_spacing: 8.0,
            socket_spacing: 1.5,
        }
    }
}

/// Where a node sits in the layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodePlacement {
    /// The placed node.
    pub node_id: JobId,
    /// Execution level.
    pub level: usize,
    /// Index among the nodes of the same level, in node order.
    pub index_in_level: usize,
    /// Index centered around zero.
    pub position: f64,
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

/// Placement of every node of a workflow, grouped by execution level.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    placements: Vec<NodePlacement>,
    #[serde(skip)]
    index: HashMap<JobId, usize>,
    #[serde(skip)]
    config: LayoutConfig,
}

impl Layout {
    /// Places the nodes of `workflow` by level and by order within a level.
    pub fn compute(
        workflow: &Workflow,
        levels: &ExecutionLevels,
        config: LayoutConfig,
    ) -> WorkflowResult<Self> {
        let node_levels = workflow
            .nodes()
            .iter()
            .map(|node| {
                levels
                    .get(node.id())
                    .ok_or_else(|| WorkflowError::NodeNotFound(node.id().clone()))
            })
            .collect::<WorkflowResult<Vec<_>>>()?;

        let mut level_sizes: HashMap<usize, usize> = HashMap::new();
        for &level in &node_levels {
            *level_sizes.entry(level).or_default() += 1;
        }

        let mut next_index: HashMap<usize, usize> = HashMap::new();
        let mut placements = Vec::with_capacity(workflow.node_count());
        for (node, level) in workflow.nodes().iter().zip(node_levels) {
            let slot = next_index.entry(level).or_default();
            let index_in_level = *slot;
            *slot += 1;
            let position = centered(index_in_level, level_sizes[&level]);

            placements.push(NodePlacement {
                node_id: node.id().clone(),
                level,
                index_in_level,
                position,
                x: level as f64 * config.horizontal_spacing,
                y: position * config.vertical_spacing,
            });
        }

        let index = placements
            .iter()
            .enumerate()
            .map(|(i, placement)| (placement.node_id.clone(), i))
            .collect();

        Ok(Self {
            placements,
            index,
            config,
        })
    }

    /// Returns the spacing the layout was computed with.
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Returns the placement of a node.
    pub fn placement(&self, id: &JobId) -> Option<&NodePlacement> {
        self.index.get(id).map(|&i| &self.placements[i])
    }

    /// Returns the centered position of a node within its level.
    pub fn position(&self, id: &JobId) -> Option<f64> {
        self.placement(id).map(|placement| placement.position)
    }

    /// Returns all placements in node order.
    pub fn placements(&self) -> &[NodePlacement] {
        &self.placements
    }

    /// Returns the offsets of `count` sockets centered on a node.
    pub fn socket_offsets(count: usize, spacing: f64) -> Vec<f64> {
        (0..count).map(|i| centered(i, count) * spacing).collect()
    }
}

fn centered(index: usize, count: usize) -> f64 {
    index as f64 - count.saturating_sub(1) as f64 / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{WorkflowEdge, WorkflowNode};
    use crate::job::Job;
    use crate::schedule::compute_execution_levels;

    fn fan_in() -> Workflow {
        Workflow::from_parts(
            vec![
                WorkflowNode::new(Job::new("a", "a").with_outputs(["x"])),
                WorkflowNode::new(Job::new("b", "b").with_outputs(["y"])),
                WorkflowNode::new(Job::new("c", "c").with_outputs(["z"])),
                WorkflowNode::new(Job::new("d", "d").with_inputs(["x", "y", "z"])),
            ],
            vec![
                WorkflowEdge::new("a", "d", "x"),
                WorkflowEdge::new("b", "d", "y"),
                WorkflowEdge::new("c", "d", "z"),
            ],
        )
    }

    #[test]
    fn test_positions_are_centered() {
        let workflow = fan_in();
        let levels = compute_execution_levels(&workflow).unwrap();
        let layout = Layout::compute(&workflow, &levels, LayoutConfig::default()).unwrap();

        assert_eq!(layout.position(&"a".into()), Some(-1.0));
        assert_eq!(layout.position(&"b".into()), Some(0.0));
        assert_eq!(layout.position(&"c".into()), Some(1.0));
        assert_eq!(layout.position(&"d".into()), Some(0.0));

        let c = layout.placement(&"c".into()).unwrap();
        assert_eq!((c.x, c.y), (0.0, 8.0));
        let d = layout.placement(&"d".into()).unwrap();
        assert_eq!(d.x, 15.0);
    }

    #[test]
    fn test_socket_offsets() {
        assert_eq!(Layout::socket_offsets(1, 1.5), vec![0.0]);
        assert_eq!(Layout::socket_offsets(2, 1.5), vec![-0.75, 0.75]);
        assert_eq!(Layout::socket_offsets(3, 1.5), vec![-1.5, 0.0, 1.5]);
        assert!(Layout::socket_offsets(0, 1.5).is_empty());
    }

    #[test]
    fn test_missing_level() {
        let workflow = fan_in();
        let error = Layout::compute(&workflow, &ExecutionLevels::default(), LayoutConfig::default())
            .unwrap_err();
        assert!(matches!(error, WorkflowError::NodeNotFound(_)));
    }
}

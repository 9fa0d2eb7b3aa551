//! Input socket ordering.

use std::cmp::Ordering;

use super::{Layout, LayoutConfig, compute_execution_levels};
use crate::error::{WorkflowError, WorkflowResult};
use crate::graph::{Workflow, WorkflowNode};
use crate::job::{JobId, Role};

/// Orders a consumer's input sockets by the vertical position of their
/// producers so that connections cross less when rendered.
#[derive(Debug, Clone, Copy)]
pub struct SocketOrderOptimizer<'a> {
    workflow: &'a Workflow,
    layout: &'a Layout,
}

impl<'a> SocketOrderOptimizer<'a> {
    /// Creates an optimizer over a workflow and its layout.
    pub fn new(workflow: &'a Workflow, layout: &'a Layout) -> Self {
        Self { workflow, layout }
    }

    /// Returns the declared inputs of a node sorted by producer position.
    ///
    /// The sort is stable. Inputs without a producing edge, and inputs fed by
    /// a synthetic source, keep their declared order after all others.
    pub fn input_order(&self, node_id: &JobId) -> WorkflowResult<Vec<Role>> {
        let node = self
            .workflow
            .node(node_id)
            .ok_or_else(|| WorkflowError::NodeNotFound(node_id.clone()))?;

        let mut keyed: Vec<(Option<f64>, &Role)> = node
            .job
            .inputs
            .iter()
            .map(|role| (self.producer_position(node_id, role), role))
            .collect();

        keyed.sort_by(|(a, _), (b, _)| match (a, b) {
            (Some(a), Some(b)) => a.total_cmp(b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });

        Ok(keyed.into_iter().map(|(_, role)| role.clone()).collect())
    }

    /// Returns the input order of every node that has inputs, in node order.
    pub fn all_orders(&self) -> WorkflowResult<Vec<(JobId, Vec<Role>)>> {
        self.workflow
            .nodes()
            .iter()
            .filter(|node| !node.job.inputs.is_empty())
            .map(|node| {
                self.input_order(node.id())
                    .map(|order| (node.id().clone(), order))
            })
            .collect()
    }

    fn producer_position(&self, node_id: &JobId, role: &Role) -> Option<f64> {
        let edge = self.workflow.edge_delivering(node_id, role)?;
        let producer = self.workflow.node(&edge.from)?;
        if producer.is_synthetic {
            return None;
        }
        self.layout.position(producer.id())
    }
}

/// Returns the inputs of `node` ordered by the position of their producers in
/// the default layout of `workflow`.
pub fn optimized_input_order(node: &WorkflowNode, workflow: &Workflow) -> WorkflowResult<Vec<Role>> {
    let levels = compute_execution_levels(workflow)?;
    let layout = Layout::compute(workflow, &levels, LayoutConfig::default())?;
    SocketOrderOptimizer::new(workflow, &layout).input_order(node.id())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::WorkflowEdge;
    use crate::job::Job;
    use crate::registry::ResourceTypeRegistry;
    use crate::resolve::resolve_workflows;

    fn crossing() -> Workflow {
        Workflow::from_parts(
            vec![
                WorkflowNode::new(Job::new("a", "a").with_outputs(["x"])),
                WorkflowNode::new(Job::new("b", "b").with_outputs(["y"])),
                WorkflowNode::new(Job::new("c", "c").with_inputs(["q", "y", "x"])),
            ],
            vec![
                WorkflowEdge::new("a", "c", "x"),
                WorkflowEdge::new("b", "c", "y"),
            ],
        )
    }

    #[test]
    fn test_sorted_by_producer_position() {
        let workflow = crossing();
        let node = workflow.node(&"c".into()).unwrap();

        let order = optimized_input_order(node, &workflow).unwrap();
        assert_eq!(order, vec![Role::from("x"), Role::from("y"), Role::from("q")]);
    }

    #[test]
    fn test_order_is_stable() {
        let workflow = crossing();
        let node = workflow.node(&"c".into()).unwrap();

        let first = optimized_input_order(node, &workflow).unwrap();
        let second = optimized_input_order(node, &workflow).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_unresolved_inputs_keep_order() {
        let workflow = Workflow::from_parts(
            vec![WorkflowNode::new(Job::new("c", "c").with_inputs(["r", "p", "q"]))],
            Vec::new(),
        );
        let node = workflow.node(&"c".into()).unwrap();

        let order = optimized_input_order(node, &workflow).unwrap();
        assert_eq!(order, vec![Role::from("r"), Role::from("p"), Role::from("q")]);
    }

    #[test]
    fn test_all_orders_skip_sources() {
        let workflow = crossing();
        let levels = compute_execution_levels(&workflow).unwrap();
        let layout = Layout::compute(&workflow, &levels, LayoutConfig::default()).unwrap();

        let orders = SocketOrderOptimizer::new(&workflow, &layout).all_orders().unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].0.as_str(), "c");
    }

    #[test]
    fn test_unknown_node() {
        let workflow = crossing();
        let levels = compute_execution_levels(&workflow).unwrap();
        let layout = Layout::compute(&workflow, &levels, LayoutConfig::default()).unwrap();

        let error = SocketOrderOptimizer::new(&workflow, &layout)
            .input_order(&"ghost".into())
            .unwrap_err();
        assert!(matches!(error, WorkflowError::NodeNotFound(_)));
    }

    #[test]
    fn test_synthetic_inputs_go_last() {
        let jobs = vec![
            Job::new("a", "a").with_outputs(["x"]),
            Job::new("b1", "b1").with_inputs(["x"]).with_outputs(["y1"]),
            Job::new("b2", "b2").with_inputs(["x"]).with_outputs(["y2"]),
            Job::new("b3", "b3").with_inputs(["x"]).with_outputs(["y3"]),
            Job::new("c", "c").with_inputs(["q", "y3"]).with_outputs(["z"]),
        ];
        let workflows = resolve_workflows(jobs, &ResourceTypeRegistry::new()).unwrap();
        assert_eq!(workflows.len(), 1);

        let workflow = &workflows[0];
        assert_eq!(workflow.synthetic_nodes().count(), 1);
        let node = workflow.node(&"c".into()).unwrap();

        let order = optimized_input_order(node, workflow).unwrap();
        assert_eq!(order, vec![Role::from("y3"), Role::from("q")]);
    }
}

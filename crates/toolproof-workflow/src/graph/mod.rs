//! Workflow graph structures.
//!
//! This module provides the graph representation produced by resolution:
//! - [`Workflow`]: a connected graph of nodes and edges
//! - [`WorkflowNode`]: a job placed in a workflow, possibly synthetic
//! - [`WorkflowEdge`]: a producer-to-consumer connection with its data flow

mod edge;
mod node;
mod workflow;

pub use edge::WorkflowEdge;
pub use node::WorkflowNode;
pub use workflow::Workflow;

//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types.

pub use crate::compile::{CompileOptions, CompiledWorkflow, ManualBindings, compile_workflow};
pub use crate::error::{WorkflowError, WorkflowResult};
pub use crate::graph::{Workflow, WorkflowEdge, WorkflowNode};
pub use crate::job::{Job, JobId, JobPool, Role};
pub use crate::registry::{ResourceType, ResourceTypeDef, ResourceTypeRegistry};
pub use crate::resolve::{
    Diagnostic, ProducerPolicy, Resolution, Resolver, ResolverConfig, resolve_workflows,
};
pub use crate::schedule::{
    ExecutionLevels, Layout, LayoutConfig, SocketOrderOptimizer, compute_execution_levels,
    optimized_input_order,
};

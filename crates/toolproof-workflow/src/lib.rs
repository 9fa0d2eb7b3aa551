#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

pub mod compile;
mod error;
pub mod graph;
pub mod job;
pub mod registry;
pub mod resolve;
pub mod schedule;

#[doc(hidden)]
pub mod prelude;

pub use error::{WorkflowError, WorkflowResult};
pub use resolve::resolve_workflows;
pub use schedule::{compute_execution_levels, optimized_input_order};

/// Tracing target for workflow operations.
pub const TRACING_TARGET: &str = "toolproof_workflow";

/// Tracing target for graph wiring and partitioning.
pub const TRACING_TARGET_RESOLVE: &str = "toolproof_workflow::resolve";

/// Tracing target for level scheduling and layout.
pub const TRACING_TARGET_SCHEDULE: &str = "toolproof_workflow::schedule";

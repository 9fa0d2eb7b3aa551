//! Layered scheduling of resolved workflows.
//!
//! - [`compute_execution_levels`]: longest-path levels via Kahn's algorithm
//! - [`Layout`]: centered per-level placement derived from the levels
//! - [`SocketOrderOptimizer`]: input orderings that reduce edge crossings

mod layout;
mod levels;
mod sockets;

pub use layout::{Layout, LayoutConfig, NodePlacement};
pub use levels::{ExecutionLevels, compute_execution_levels};
pub use sockets::{SocketOrderOptimizer, optimized_input_order};

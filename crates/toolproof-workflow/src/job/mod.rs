//! Job descriptors and job pools.
//!
//! - [`Job`]: an immutable unit of work with input and output [`Role`]s
//! - [`JobId`]: unique identifier of a job and of the node wrapping it
//! - [`JobPool`]: the canonical versioned document holding jobs

mod id;
#[allow(clippy::module_inception)]
mod job;
mod pool;
mod role;

pub(crate) use id::SyntheticIds;
pub use id::JobId;
pub use job::Job;
pub use pool::{JobPool, ensure_unique_ids};
pub use role::Role;

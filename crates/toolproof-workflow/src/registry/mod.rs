//! Registry of typed resource roles.
//!
//! - [`ResourceTypeRegistry`]: deduplicated store keyed by display name
//! - [`ResourceType`]: a registered, identified resource type
//! - [`ResourceTypeDef`]: a definition prior to registration

mod id;
#[allow(clippy::module_inception)]
mod registry;
mod resource;

pub use id::ResourceTypeId;
pub use registry::ResourceTypeRegistry;
pub use resource::{
    ResourceType, ResourceTypeDef, ResourceTypeDefBuilder, ResourceTypeDefError, SemanticSpec,
    SyntacticSpec,
};

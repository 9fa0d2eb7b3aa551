//! Resolver configuration.

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use super::ProducerPolicy;

/// Options controlling how job pools are resolved into workflows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Builder, Serialize, Deserialize)]
#[builder(
    name = "ResolverConfigBuilder",
    pattern = "owned",
    setter(into, strip_option, prefix = "with"),
    build_fn(private, name = "build_inner", error = "ResolverConfigError")
)]
#[serde(default, rename_all = "camelCase")]
pub struct ResolverConfig {
    /// Tie-break between several producers of one role.
    #[builder(default)]
    pub producer_policy: ProducerPolicy,
    /// Reject job roles that are not defined in the registry.
    #[builder(default)]
    pub strict_roles: bool,
}

/// Error type for ResolverConfig builder.
pub type ResolverConfigError = derive_builder::UninitializedFieldError;

impl ResolverConfigBuilder {
    /// Build the configuration.
    pub fn build(self) -> Result<ResolverConfig, ResolverConfigError> {
        self.build_inner()
    }
}

impl ResolverConfig {
    /// Create a builder for this configuration.
    pub fn builder() -> ResolverConfigBuilder {
        ResolverConfigBuilder::default()
    }
}

//! Compiler options.

use std::collections::BTreeMap;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::job::{JobId, Role};

/// User supplied bindings for one step, overriding the generated ones.
///
/// An input value containing `/` is read as a resource path whose file stem
/// becomes the resource key. Any other value is used as the key verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ManualBindings {
    /// Input role to resource key or path.
    pub inputs: BTreeMap<Role, String>,
    /// Output role to resource key.
    pub outputs: BTreeMap<Role, String>,
}

impl ManualBindings {
    /// Adds an input override.
    pub fn with_input(mut self, role: impl Into<Role>, value: impl Into<String>) -> Self {
        self.inputs.insert(role.into(), value.into());
        self
    }

    /// Adds an output override.
    pub fn with_output(mut self, role: impl Into<Role>, key: impl Into<String>) -> Self {
        self.outputs.insert(role.into(), key.into());
        self
    }
}

/// Options for compiling a workflow into step bindings.
#[derive(Debug, Clone, PartialEq, Eq, Builder, Serialize, Deserialize)]
#[builder(
    name = "CompileOptionsBuilder",
    pattern = "owned",
    setter(into, strip_option, prefix = "with"),
    build_fn(private, name = "build_inner", error = "CompileOptionsError")
)]
#[serde(default, rename_all = "camelCase")]
pub struct CompileOptions {
    /// Prefix of generated resource paths.
    #[builder(default = "CompileOptions::DEFAULT_NAMESPACE.to_owned()")]
    pub namespace: String,
    /// Overrides keyed by job id.
    #[builder(default)]
    pub manual_bindings: BTreeMap<JobId, ManualBindings>,
}

/// Error type for CompileOptions builder.
pub type CompileOptionsError = derive_builder::UninitializedFieldError;

impl CompileOptionsBuilder {
    /// Build the options.
    pub fn build(self) -> Result<CompileOptions, CompileOptionsError> {
        self.build_inner()
    }
}

impl CompileOptions {
    /// Namespace used when none is given.
    pub const DEFAULT_NAMESPACE: &'static str = "workflow";

    /// Create a builder for these options.
    pub fn builder() -> CompileOptionsBuilder {
        CompileOptionsBuilder::default()
    }

    /// Returns the path of an external input resource.
    pub fn input_path(&self, key: &str) -> String {
        format!("{}/_inputs/{key}.json", self.namespace)
    }
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            namespace: Self::DEFAULT_NAMESPACE.to_owned(),
            manual_bindings: BTreeMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let options = CompileOptions::builder().build().unwrap();
        assert_eq!(options, CompileOptions::default());
        assert_eq!(options.input_path("num_alpha"), "workflow/_inputs/num_alpha.json");
    }

    #[test]
    fn test_deserialize_manual_bindings() {
        let options: CompileOptions = serde_json::from_str(
            r#"{
                "namespace": "calculator",
                "manualBindings": {
                    "add": {"inputs": {"addend_1": "calculator/_inputs/num_1.json"}}
                }
            }"#,
        )
        .unwrap();

        let bindings = &options.manual_bindings[&JobId::from("add")];
        assert_eq!(
            bindings.inputs[&Role::from("addend_1")],
            "calculator/_inputs/num_1.json"
        );
        assert!(bindings.outputs.is_empty());
    }
}

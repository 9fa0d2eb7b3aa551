//! Resource type records.

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use super::ResourceTypeId;

/// Meaning of a resource type.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SemanticSpec {
    /// What the resource represents.
    #[serde(default)]
    pub description: String,
    /// Optional embedding used for similarity search.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub embedding: Vec<f32>,
}

/// Encoding of a resource type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntacticSpec {
    /// Storage format, `json` unless stated otherwise.
    pub format: String,
    /// JSON schema for validation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<serde_json::Value>,
}

/// A named, typed kind of data flowing between jobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceType {
    /// Unique identifier.
    pub id: ResourceTypeId,
    /// Registry key, unique within one registry.
    pub display_name: String,
    /// Meaning of the resource.
    pub semantic_spec: SemanticSpec,
    /// Encoding of the resource.
    pub syntactic_spec: SyntacticSpec,
}

impl ResourceType {
    /// Returns the description.
    pub fn description(&self) -> &str {
        &self.semantic_spec.description
    }

    /// Returns the format.
    pub fn format(&self) -> &str {
        &self.syntactic_spec.format
    }
}

/// Definition of a resource type prior to registration.
#[derive(Debug, Clone, PartialEq, Builder, Serialize, Deserialize)]
#[builder(
    name = "ResourceTypeDefBuilder",
    pattern = "owned",
    setter(into, strip_option, prefix = "with"),
    build_fn(private, name = "build_inner", error = "ResourceTypeDefError")
)]
#[serde(rename_all = "camelCase")]
pub struct ResourceTypeDef {
    /// Registry key.
    pub display_name: String,
    /// What the resource represents.
    #[builder(default)]
    #[serde(default)]
    pub description: String,
    /// Optional embedding.
    #[builder(default)]
    #[serde(default)]
    pub embedding: Vec<f32>,
    /// Storage format.
    #[builder(default = "ResourceTypeDef::DEFAULT_FORMAT.to_owned()")]
    #[serde(default = "ResourceTypeDef::default_format")]
    pub format: String,
    /// JSON schema for validation.
    #[builder(default)]
    #[serde(default)]
    pub schema: Option<serde_json::Value>,
}

/// Error type for ResourceTypeDef builder.
pub type ResourceTypeDefError = derive_builder::UninitializedFieldError;

impl ResourceTypeDefBuilder {
    /// Build the definition.
    pub fn build(self) -> Result<ResourceTypeDef, ResourceTypeDefError> {
        self.build_inner()
    }
}

impl ResourceTypeDef {
    /// Format used when none is given.
    pub const DEFAULT_FORMAT: &'static str = "json";

    fn default_format() -> String {
        Self::DEFAULT_FORMAT.to_owned()
    }

    /// Creates a definition with default description, embedding, format and schema.
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            description: String::new(),
            embedding: Vec::new(),
            format: Self::default_format(),
            schema: None,
        }
    }

    /// Create a builder for this definition.
    pub fn builder() -> ResourceTypeDefBuilder {
        ResourceTypeDefBuilder::default()
    }

    /// Turns the definition into a record with a fresh id.
    pub(crate) fn into_resource_type(self) -> ResourceType {
        ResourceType {
            id: ResourceTypeId::new(),
            display_name: self.display_name,
            semantic_spec: SemanticSpec {
                description: self.description,
                embedding: self.embedding,
            },
            syntactic_spec: SyntacticSpec {
                format: self.format,
                schema: self.schema,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let def = ResourceTypeDef::builder()
            .with_display_name("pose")
            .build()
            .unwrap();

        assert_eq!(def, ResourceTypeDef::new("pose"));
        assert_eq!(def.format, "json");
    }

    #[test]
    fn test_builder_requires_name() {
        assert!(ResourceTypeDef::builder().with_format("pdb").build().is_err());
    }

    #[test]
    fn test_deserialize_defaults() {
        let def: ResourceTypeDef = serde_json::from_str(r#"{"displayName": "box"}"#).unwrap();
        assert_eq!(def, ResourceTypeDef::new("box"));
    }
}

//! Resource type registry.

use std::collections::HashMap;

use super::{ResourceType, ResourceTypeDef};
use crate::error::{WorkflowError, WorkflowResult};

/// Deduplicated store of resource types keyed by display name.
///
/// Registries are plain values: resolution borrows one explicitly, so tests
/// and concurrent callers can each use an isolated instance. Iteration order
/// is definition order.
#[derive(Debug, Clone, Default)]
pub struct ResourceTypeRegistry {
    /// Resource types in definition order.
    resource_types: Vec<ResourceType>,
    /// Mapping from display name to position in `resource_types`.
    by_name: HashMap<String, usize>,
}

impl ResourceTypeRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with the common `number` and `character` types.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.define_many([
            ResourceTypeDef::new("number"),
            ResourceTypeDef::new("character"),
        ]);
        registry
    }

    /// Defines a resource type, returning the existing entry if the name is
    /// already taken.
    pub fn define(
        &mut self,
        display_name: impl Into<String>,
        description: impl Into<String>,
        format: impl Into<String>,
    ) -> &ResourceType {
        self.define_with(ResourceTypeDef {
            description: description.into(),
            format: format.into(),
            ..ResourceTypeDef::new(display_name)
        })
    }

    /// Defines a resource type from a full definition.
    ///
    /// Idempotent on the display name: a second definition with the same name
    /// leaves the first one untouched.
    pub fn define_with(&mut self, def: ResourceTypeDef) -> &ResourceType {
        let index = match self.by_name.get(&def.display_name) {
            Some(&index) => index,
            None => {
                let index = self.resource_types.len();
                self.by_name.insert(def.display_name.clone(), index);
                self.resource_types.push(def.into_resource_type());
                index
            }
        };

        &self.resource_types[index]
    }

    /// Defines several resource types at once.
    pub fn define_many(
        &mut self,
        defs: impl IntoIterator<Item = ResourceTypeDef>,
    ) -> Vec<ResourceType> {
        defs.into_iter()
            .map(|def| self.define_with(def).clone())
            .collect()
    }

    /// Returns the resource type with the given display name.
    pub fn get(&self, display_name: &str) -> WorkflowResult<&ResourceType> {
        self.by_name
            .get(display_name)
            .map(|&index| &self.resource_types[index])
            .ok_or_else(|| WorkflowError::ResourceTypeNotFound {
                name: display_name.to_owned(),
            })
    }

    /// Returns whether a resource type with this display name exists.
    pub fn has(&self, display_name: &str) -> bool {
        self.by_name.contains_key(display_name)
    }

    /// Returns every resource type in definition order.
    pub fn get_all(&self) -> &[ResourceType] {
        &self.resource_types
    }

    /// Returns resource types with the given format.
    pub fn find_by_format(&self, format: &str) -> Vec<&ResourceType> {
        self.resource_types
            .iter()
            .filter(|resource_type| resource_type.format() == format)
            .collect()
    }

    /// Returns resource types whose display name contains `partial_name`,
    /// ignoring case.
    pub fn find_by_display_name(&self, partial_name: &str) -> Vec<&ResourceType> {
        let needle = partial_name.to_lowercase();
        self.resource_types
            .iter()
            .filter(|resource_type| resource_type.display_name.to_lowercase().contains(&needle))
            .collect()
    }

    /// Returns the number of resource types.
    pub fn len(&self) -> usize {
        self.resource_types.len()
    }

    /// Returns whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.resource_types.is_empty()
    }
}

impl FromIterator<ResourceTypeDef> for ResourceTypeRegistry {
    fn from_iter<T: IntoIterator<Item = ResourceTypeDef>>(iter: T) -> Self {
        let mut registry = Self::new();
        registry.define_many(iter);
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_define_is_idempotent() {
        let mut registry = ResourceTypeRegistry::new();
        let first = registry.define("target", "Receptor", "pdb").clone();
        let second = registry.define("target", "Something else", "json").clone();

        assert_eq!(first, second);
        assert_eq!(second.description(), "Receptor");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_get_unknown_is_not_found() {
        let registry = ResourceTypeRegistry::new();
        let error = registry.get("missing").unwrap_err();
        assert!(matches!(
            error,
            WorkflowError::ResourceTypeNotFound { name } if name == "missing"
        ));
    }

    #[test]
    fn test_with_defaults() {
        let registry = ResourceTypeRegistry::with_defaults();
        assert!(registry.has("number"));
        assert!(registry.has("character"));
        assert_eq!(registry.get("number").unwrap().format(), "json");
    }

    #[test]
    fn test_queries() {
        let registry: ResourceTypeRegistry = [
            ResourceTypeDef {
                format: "pdb".into(),
                ..ResourceTypeDef::new("Anchor Ligand")
            },
            ResourceTypeDef {
                format: "pdb".into(),
                ..ResourceTypeDef::new("target")
            },
            ResourceTypeDef::new("box"),
        ]
        .into_iter()
        .collect();

        let pdb: Vec<_> = registry
            .find_by_format("pdb")
            .into_iter()
            .map(|resource_type| resource_type.display_name.as_str())
            .collect();
        assert_eq!(pdb, vec!["Anchor Ligand", "target"]);

        let ligands = registry.find_by_display_name("ligand");
        assert_eq!(ligands.len(), 1);
        assert_eq!(ligands[0].display_name, "Anchor Ligand");

        let names: Vec<_> = registry
            .get_all()
            .iter()
            .map(|resource_type| resource_type.display_name.as_str())
            .collect();
        assert_eq!(names, vec!["Anchor Ligand", "target", "box"]);
    }

    #[test]
    fn test_isolated_instances() {
        let mut first = ResourceTypeRegistry::new();
        first.define("pose", "", "json");
        let second = ResourceTypeRegistry::new();

        assert!(first.has("pose"));
        assert!(!second.has("pose"));
    }
}

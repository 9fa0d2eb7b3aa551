//! Job descriptor.

use serde::{Deserialize, Serialize};

use super::{JobId, Role};
use crate::error::WorkflowResult;
use crate::registry::ResourceTypeRegistry;

/// A typed unit of work with named input and output resource roles.
///
/// Jobs are immutable inputs to resolution: the resolver never mutates them,
/// it only wraps them in workflow nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    /// Unique identifier within one job pool.
    pub id: JobId,
    /// Human readable name.
    #[serde(alias = "name", alias = "display_name")]
    pub display_name: String,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Roles this job consumes, in declaration order.
    #[serde(default)]
    pub inputs: Vec<Role>,
    /// Roles this job produces, in declaration order.
    #[serde(default)]
    pub outputs: Vec<Role>,
}

impl Job {
    /// Creates a job with no inputs and no outputs.
    pub fn new(id: impl Into<JobId>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            description: String::new(),
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }

    /// Creates a job whose roles are checked against a resource type registry.
    ///
    /// Fails with [`ResourceTypeNotFound`] for the first role that was never
    /// defined in `registry`.
    ///
    /// [`ResourceTypeNotFound`]: crate::WorkflowError::ResourceTypeNotFound
    pub fn typed(
        id: impl Into<JobId>,
        display_name: impl Into<String>,
        inputs: &[&str],
        outputs: &[&str],
        registry: &ResourceTypeRegistry,
    ) -> WorkflowResult<Self> {
        let resolve = |names: &[&str]| -> WorkflowResult<Vec<Role>> {
            names
                .iter()
                .map(|name| registry.get(name).map(Role::from))
                .collect()
        };

        Ok(Self {
            inputs: resolve(inputs)?,
            outputs: resolve(outputs)?,
            ..Self::new(id, display_name)
        })
    }

    /// Creates the zero-input, single-output source job standing in for an
    /// externally supplied `role`.
    pub fn synthetic_source(id: JobId, role: &Role) -> Self {
        Self {
            id,
            display_name: format!("load_{role}"),
            description: format!("Loads externally supplied '{role}'"),
            inputs: Vec::new(),
            outputs: vec![role.clone()],
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the input roles.
    pub fn with_inputs<I, R>(mut self, inputs: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<Role>,
    {
        self.inputs = inputs.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the output roles.
    pub fn with_outputs<I, R>(mut self, outputs: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<Role>,
    {
        self.outputs = outputs.into_iter().map(Into::into).collect();
        self
    }

    /// Returns whether this job lists `role` among its inputs.
    pub fn consumes(&self, role: &Role) -> bool {
        self.inputs.contains(role)
    }

    /// Returns whether this job lists `role` among its outputs.
    pub fn produces(&self, role: &Role) -> bool {
        self.outputs.contains(role)
    }

    /// Returns whether this job has no inputs.
    pub fn is_source(&self) -> bool {
        self.inputs.is_empty()
    }

    /// Checks every role of this job against `registry`.
    pub fn validate_roles(&self, registry: &ResourceTypeRegistry) -> WorkflowResult<()> {
        for role in self.inputs.iter().chain(&self.outputs) {
            registry.get(role.as_str())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WorkflowError;

    #[test]
    fn test_synthetic_source_shape() {
        let role = Role::from("target");
        let job = Job::synthetic_source(JobId::synthetic(&role, 1), &role);

        assert_eq!(job.display_name, "load_target");
        assert!(job.is_source());
        assert_eq!(job.outputs, vec![Role::from("target")]);
    }

    #[test]
    fn test_typed_requires_defined_roles() {
        let mut registry = ResourceTypeRegistry::new();
        registry.define("anchor", "Anchor ligand", "pdb");

        let job = Job::typed("gen", "generate", &["anchor"], &[], &registry).unwrap();
        assert!(job.consumes(&Role::from("anchor")));

        let error = Job::typed("gen", "generate", &["anchor"], &["candidate"], &registry)
            .unwrap_err();
        assert!(matches!(
            error,
            WorkflowError::ResourceTypeNotFound { name } if name == "candidate"
        ));
    }

    #[test]
    fn test_deserialize_legacy_record() {
        let job: Job = serde_json::from_str(
            r#"{
                "id": "dock",
                "name": "basic_docking_with_autodock",
                "inputs": ["candidate", "target", "box"],
                "outputs": [{"role": {"name": "docking"}}, "pose"]
            }"#,
        )
        .unwrap();

        assert_eq!(job.display_name, "basic_docking_with_autodock");
        assert_eq!(job.inputs.len(), 3);
        assert!(job.produces(&Role::from("docking")));
        assert!(job.description.is_empty());
    }
}

//! Compiled workflow records.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::job::{JobId, Role};

/// Location of an external resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourcePath {
    /// Path relative to the resource store.
    pub path: String,
}

/// Resource key to location.
pub type ResourceMap = BTreeMap<String, ResourcePath>;

/// One executable step with its resources bound to keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepBinding {
    /// Step id, the id of the job it runs.
    pub id: JobId,
    /// Name of the job.
    pub job_name: String,
    /// Input role to resource key.
    pub input_bindings: BTreeMap<Role, String>,
    /// Output role to resource key.
    pub output_bindings: BTreeMap<Role, String>,
}

/// A workflow compiled into ordered step bindings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledWorkflow {
    /// Identifier of this compilation.
    pub workflow_id: Uuid,
    /// Steps in execution order.
    pub steps: Vec<StepBinding>,
    /// External resources referenced by the steps.
    pub resource_maps: Vec<ResourceMap>,
}

impl CompiledWorkflow {
    /// Returns a step by id.
    pub fn step(&self, id: &JobId) -> Option<&StepBinding> {
        self.steps.iter().find(|step| &step.id == id)
    }

    /// Returns the location bound to a resource key.
    pub fn resource(&self, key: &str) -> Option<&ResourcePath> {
        self.resource_maps.iter().find_map(|map| map.get(key))
    }
}

//! Compilation of resolved workflows into step bindings.
//!
//! Each real job becomes a [`StepBinding`] that names the resource keys it
//! reads and writes. Inputs fed by synthetic sources are bound to external
//! resources listed in the [`ResourceMap`] of the [`CompiledWorkflow`].

mod binding;
mod options;

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use uuid::Uuid;

pub use binding::{CompiledWorkflow, ResourceMap, ResourcePath, StepBinding};
pub use options::{CompileOptions, CompileOptionsBuilder, CompileOptionsError, ManualBindings};

use crate::TRACING_TARGET;
use crate::error::{WorkflowError, WorkflowResult};
use crate::graph::{Workflow, WorkflowNode};
use crate::job::{JobId, Role};
use crate::schedule::ExecutionLevels;

/// Compiles `workflow` into steps ordered by execution wave.
///
/// Output roles are bound to `<role>_<step number>`, inputs to the key their
/// producer writes. Manual bindings in `options` take precedence.
///
/// # Errors
///
/// Fails when a node has no level, when an input has no producing edge, or
/// when a manual binding names a role the job does not declare.
pub fn compile_workflow(
    workflow: &Workflow,
    levels: &ExecutionLevels,
    options: &CompileOptions,
) -> WorkflowResult<CompiledWorkflow> {
    let mut output_keys: HashMap<(&JobId, &Role), String> = HashMap::new();
    let mut resources = ResourceMap::new();
    let mut steps = Vec::new();

    for id in levels.waves().iter().flatten() {
        let node = workflow
            .node(id)
            .ok_or_else(|| WorkflowError::NodeNotFound(id.clone()))?;
        if node.is_synthetic {
            continue;
        }

        let manual = options.manual_bindings.get(id);
        check_manual_roles(node, manual)?;

        let mut input_bindings = BTreeMap::new();
        for role in &node.job.inputs {
            let key = match manual.and_then(|m| m.inputs.get(role)) {
                Some(value) => {
                    let is_upstream = output_keys.values().any(|key| key == value);
                    bind_manual_input(value, is_upstream, options, &mut resources)
                }
                None => {
                    let edge = workflow.edge_delivering(id, role).ok_or_else(|| {
                        WorkflowError::UnresolvedInput {
                            node_id: id.clone(),
                            role: role.clone(),
                        }
                    })?;
                    let producer = workflow
                        .node(&edge.from)
                        .ok_or_else(|| WorkflowError::NodeNotFound(edge.from.clone()))?;

                    if producer.is_synthetic {
                        let key = role.to_string();
                        resources.entry(key.clone()).or_insert_with(|| ResourcePath {
                            path: options.input_path(&key),
                        });
                        key
                    } else {
                        output_keys
                            .get(&(producer.id(), role))
                            .cloned()
                            .ok_or_else(|| WorkflowError::UnresolvedInput {
                                node_id: id.clone(),
                                role: role.clone(),
                            })?
                    }
                }
            };
            input_bindings.insert(role.clone(), key);
        }

        let step_number = steps.len() + 1;
        let mut output_bindings = BTreeMap::new();
        for role in &node.job.outputs {
            let key = manual
                .and_then(|m| m.outputs.get(role))
                .cloned()
                .unwrap_or_else(|| format!("{role}_{step_number}"));
            output_keys.insert((node.id(), role), key.clone());
            output_bindings.insert(role.clone(), key);
        }

        steps.push(StepBinding {
            id: id.clone(),
            job_name: node.job.display_name.clone(),
            input_bindings,
            output_bindings,
        });
    }

    let compiled = CompiledWorkflow {
        workflow_id: Uuid::now_v7(),
        steps,
        resource_maps: vec![resources],
    };

    tracing::debug!(
        target: TRACING_TARGET,
        workflow_id = %compiled.workflow_id,
        steps = compiled.steps.len(),
        namespace = %options.namespace,
        "Workflow compiled",
    );

    Ok(compiled)
}

fn check_manual_roles(node: &WorkflowNode, manual: Option<&ManualBindings>) -> WorkflowResult<()> {
    let Some(manual) = manual else {
        return Ok(());
    };

    let unknown_input = manual.inputs.keys().find(|role| !node.job.consumes(role));
    let unknown_output = manual.outputs.keys().find(|role| !node.job.produces(role));
    match unknown_input.or(unknown_output) {
        Some(role) => Err(WorkflowError::InvalidDefinition(format!(
            "manual binding for '{role}' does not match any role of job {}",
            node.id()
        ))),
        None => Ok(()),
    }
}

/// Returns the resource key for a manual input value.
///
/// Paths are keyed by their file stem. Plain keys name an external resource
/// under the namespace unless they refer to an output bound upstream.
fn bind_manual_input(
    value: &str,
    is_upstream: bool,
    options: &CompileOptions,
    resources: &mut ResourceMap,
) -> String {
    if !value.contains('/') {
        if !is_upstream {
            resources.entry(value.to_owned()).or_insert_with(|| ResourcePath {
                path: options.input_path(value),
            });
        }
        return value.to_owned();
    }

    let key = Path::new(value)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| value.to_owned());
    resources.entry(key.clone()).or_insert_with(|| ResourcePath {
        path: value.to_owned(),
    });
    key
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::Job;
    use crate::registry::ResourceTypeRegistry;
    use crate::resolve::resolve_workflows;
    use crate::schedule::compute_execution_levels;

    fn calculator() -> Workflow {
        let registry = ResourceTypeRegistry::new();
        let jobs = vec![
            Job::new("add", "add_numbers")
                .with_inputs(["addend_1", "addend_2"])
                .with_outputs(["sum"]),
            Job::new("mul", "multiply_numbers")
                .with_inputs(["sum", "multiplier"])
                .with_outputs(["product"]),
        ];
        let mut workflows = resolve_workflows(jobs, &registry).unwrap();
        assert_eq!(workflows.len(), 1);
        workflows.remove(0)
    }

    fn compile(workflow: &Workflow, options: &CompileOptions) -> CompiledWorkflow {
        let levels = compute_execution_levels(workflow).unwrap();
        compile_workflow(workflow, &levels, options).unwrap()
    }

    #[test]
    fn test_generated_bindings() {
        let workflow = calculator();
        let options = CompileOptions::builder()
            .with_namespace("calculator")
            .build()
            .unwrap();
        let compiled = compile(&workflow, &options);

        assert_eq!(compiled.steps.len(), 2);
        let add = &compiled.steps[0];
        assert_eq!(add.job_name, "add_numbers");
        assert_eq!(add.input_bindings[&Role::from("addend_1")], "addend_1");
        assert_eq!(add.output_bindings[&Role::from("sum")], "sum_1");

        let mul = compiled.step(&"mul".into()).unwrap();
        assert_eq!(mul.input_bindings[&Role::from("sum")], "sum_1");
        assert_eq!(mul.input_bindings[&Role::from("multiplier")], "multiplier");
        assert_eq!(mul.output_bindings[&Role::from("product")], "product_2");

        assert_eq!(
            compiled.resource("multiplier").unwrap().path,
            "calculator/_inputs/multiplier.json"
        );
        assert!(compiled.resource("sum_1").is_none());
    }

    #[test]
    fn test_manual_bindings_override() {
        let workflow = calculator();
        let manual = ManualBindings::default()
            .with_input("addend_1", "calculator/_inputs/num_alpha.json")
            .with_input("addend_2", "num_beta")
            .with_output("sum", "total");
        let options = CompileOptions::builder()
            .with_namespace("calculator")
            .with_manual_bindings(BTreeMap::from([(JobId::from("add"), manual)]))
            .build()
            .unwrap();
        let compiled = compile(&workflow, &options);

        let add = compiled.step(&"add".into()).unwrap();
        assert_eq!(add.input_bindings[&Role::from("addend_1")], "num_alpha");
        assert_eq!(add.input_bindings[&Role::from("addend_2")], "num_beta");
        assert_eq!(
            compiled.resource("num_alpha").unwrap().path,
            "calculator/_inputs/num_alpha.json"
        );
        assert_eq!(
            compiled.resource("num_beta").unwrap().path,
            "calculator/_inputs/num_beta.json"
        );
        assert!(compiled.resource("total").is_none());

        let mul = compiled.step(&"mul".into()).unwrap();
        assert_eq!(mul.input_bindings[&Role::from("sum")], "total");
    }

    #[test]
    fn test_manual_upstream_reference_is_not_a_resource() {
        let workflow = calculator();
        let manual = ManualBindings::default().with_input("sum", "sum_1");
        let options = CompileOptions::builder()
            .with_manual_bindings(BTreeMap::from([(JobId::from("mul"), manual)]))
            .build()
            .unwrap();
        let compiled = compile(&workflow, &options);

        let mul = compiled.step(&"mul".into()).unwrap();
        assert_eq!(mul.input_bindings[&Role::from("sum")], "sum_1");
        assert!(compiled.resource("sum_1").is_none());
        assert_eq!(compiled.resource_maps[0].len(), 3);
    }

    #[test]
    fn test_manual_binding_unknown_role() {
        let workflow = calculator();
        let manual = ManualBindings::default().with_input("divisor", "d");
        let options = CompileOptions::builder()
            .with_manual_bindings(BTreeMap::from([(JobId::from("add"), manual)]))
            .build()
            .unwrap();

        let levels = compute_execution_levels(&workflow).unwrap();
        let error = compile_workflow(&workflow, &levels, &options).unwrap_err();
        assert!(matches!(error, WorkflowError::InvalidDefinition(_)));
    }

    #[test]
    fn test_serialization_shape() {
        let workflow = calculator();
        let compiled = compile(&workflow, &CompileOptions::default());
        let json = serde_json::to_value(&compiled).unwrap();

        assert_eq!(json["steps"][0]["outputBindings"]["sum"], "sum_1");
        assert_eq!(
            json["resourceMaps"][0]["addend_2"]["path"],
            "workflow/_inputs/addend_2.json"
        );
    }
}

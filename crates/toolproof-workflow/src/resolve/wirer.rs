//! Single-workflow construction from one starter job.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use super::ProducerPolicy;
use crate::TRACING_TARGET_RESOLVE;
use crate::error::{WorkflowError, WorkflowResult};
use crate::graph::{Workflow, WorkflowEdge, WorkflowNode};
use crate::job::{Job, JobId, Role, SyntheticIds};

/// Builds one connected workflow by chaining jobs onto a starter.
///
/// Producers are tracked in a reverse index from role to the nodes that
/// output it, in registration order. Its key set is the set of roles already
/// produced inside the workflow.
pub(crate) struct GraphAutoWirer<'a> {
    policy: ProducerPolicy,
    used: &'a mut HashSet<JobId>,
    synthetic_ids: &'a mut SyntheticIds,
    workflow: Workflow,
    producers: HashMap<Role, Vec<Producer>>,
}

#[derive(Debug, Clone)]
struct Producer {
    node_id: JobId,
    is_synthetic: bool,
}

impl<'a> GraphAutoWirer<'a> {
    /// Creates a wirer that marks consumed jobs in `used` and names synthetic
    /// sources from `synthetic_ids`.
    pub fn new(
        policy: ProducerPolicy,
        used: &'a mut HashSet<JobId>,
        synthetic_ids: &'a mut SyntheticIds,
    ) -> Self {
        Self {
            policy,
            used,
            synthetic_ids,
            workflow: Workflow::new(),
            producers: HashMap::new(),
        }
    }

    /// Returns whether some node of the workflow outputs `role`.
    fn is_produced(&self, role: &Role) -> bool {
        self.producers.contains_key(role)
    }

    /// Returns whether `job` can be attached to the workflow.
    ///
    /// Zero-input jobs never chain: they start workflows of their own.
    fn is_chainable(&self, job: &Job) -> bool {
        !self.used.contains(&job.id) && job.inputs.iter().any(|role| self.is_produced(role))
    }

    /// Processes `start`, then repeatedly processes the first chainable job of
    /// `pool` until a full scan finds none.
    pub fn build(mut self, start: &Arc<Job>, pool: &[Arc<Job>]) -> WorkflowResult<Workflow> {
        self.process_job(start)?;

        while let Some(job) = pool.iter().find(|job| self.is_chainable(job)) {
            self.process_job(job)?;
        }

        tracing::debug!(
            target: TRACING_TARGET_RESOLVE,
            starter = %start.id,
            nodes = self.workflow.node_count(),
            edges = self.workflow.edge_count(),
            "Workflow wired",
        );

        Ok(self.workflow)
    }

    fn process_job(&mut self, job: &Arc<Job>) -> WorkflowResult<()> {
        let inputs = unique_roles(&job.inputs);

        for role in &inputs {
            if !self.is_produced(role) {
                self.add_synthetic_source(role)?;
            }
        }

        self.workflow.add_node(WorkflowNode::new(Arc::clone(job)))?;

        for role in inputs {
            let producer = self.select_producer(&job.id, &role)?;
            self.workflow
                .add_edge(WorkflowEdge::new(producer, job.id.clone(), role))?;
        }

        for role in unique_roles(&job.outputs) {
            self.register_producer(role, &job.id, false)?;
        }

        self.used.insert(job.id.clone());

        tracing::trace!(
            target: TRACING_TARGET_RESOLVE,
            job_id = %job.id,
            "Job attached",
        );

        Ok(())
    }

    fn add_synthetic_source(&mut self, role: &Role) -> WorkflowResult<()> {
        let node_id = self.synthetic_ids.next_for(role);
        let source = Job::synthetic_source(node_id.clone(), role);

        self.workflow.add_node(WorkflowNode::synthetic(source))?;
        self.register_producer(role.clone(), &node_id, true)?;

        tracing::trace!(
            target: TRACING_TARGET_RESOLVE,
            node_id = %node_id,
            role = %role,
            "Synthetic source added",
        );

        Ok(())
    }

    fn register_producer(
        &mut self,
        role: Role,
        node_id: &JobId,
        is_synthetic: bool,
    ) -> WorkflowResult<()> {
        let producers = self.producers.entry(role.clone()).or_default();

        // Synthetic sources never conflict: they only exist for roles that had
        // no producer when they were added.
        if !self.policy.allows_shared_roles()
            && !is_synthetic
            && let Some(existing) = producers.iter().find(|p| !p.is_synthetic)
        {
            return Err(WorkflowError::AmbiguousProducer {
                role,
                existing: existing.node_id.clone(),
                candidate: node_id.clone(),
            });
        }

        producers.push(Producer {
            node_id: node_id.clone(),
            is_synthetic,
        });
        Ok(())
    }

    fn select_producer(&self, consumer: &JobId, role: &Role) -> WorkflowResult<JobId> {
        let producers = self.producers.get(role).map(Vec::as_slice).unwrap_or_default();

        let selected = match self.policy {
            ProducerPolicy::MostRecent => producers.last(),
            ProducerPolicy::FirstRegistered | ProducerPolicy::Reject => producers.first(),
        };

        selected
            .map(|producer| producer.node_id.clone())
            .ok_or_else(|| WorkflowError::UnresolvedInput {
                node_id: consumer.clone(),
                role: role.clone(),
            })
    }
}

/// Returns roles in first-occurrence order without repeats.
fn unique_roles(roles: &[Role]) -> Vec<Role> {
    let mut seen = HashSet::with_capacity(roles.len());
    roles
        .iter()
        .filter(|role| seen.insert(*role))
        .cloned()
        .collect()
}

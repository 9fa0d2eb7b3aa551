//! Partitioning of a job pool into independent workflows.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use super::{Diagnostic, GraphAutoWirer, ProducerPolicy};
use crate::TRACING_TARGET_RESOLVE;
use crate::error::WorkflowResult;
use crate::graph::Workflow;
use crate::job::{Job, JobId, Role, SyntheticIds};

/// Drives [`GraphAutoWirer`] over a whole pool so that every job lands in
/// exactly one workflow.
pub(crate) struct WorkflowPartitioner {
    policy: ProducerPolicy,
    used: HashSet<JobId>,
    synthetic_ids: SyntheticIds,
    workflows: Vec<Workflow>,
    diagnostics: Vec<Diagnostic>,
}

impl WorkflowPartitioner {
    /// Creates a partitioner with an empty used set.
    pub fn new(policy: ProducerPolicy) -> Self {
        Self {
            policy,
            used: HashSet::new(),
            synthetic_ids: SyntheticIds::default(),
            workflows: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Partitions `pool` and returns the workflows with the diagnostics raised
    /// along the way.
    pub fn partition(
        mut self,
        pool: &[Arc<Job>],
    ) -> WorkflowResult<(Vec<Workflow>, Vec<Diagnostic>)> {
        self.synthetic_ids = SyntheticIds::new(pool.iter().map(|job| job.id.clone()));

        while let Some(first_unused) = pool.iter().find(|job| !self.used.contains(&job.id)) {
            let used_before = self.used.len();
            let starters = find_starter_jobs(pool, &self.used);

            if starters.is_empty() {
                tracing::warn!(
                    target: TRACING_TARGET_RESOLVE,
                    job_id = %first_unused.id,
                    "No starter job left, forcing the first unused job as starter",
                );
                self.diagnostics.push(Diagnostic::ForcedStarter {
                    job_id: first_unused.id.clone(),
                });
                self.build_from(first_unused, pool)?;
            } else {
                for starter in starters {
                    // An earlier starter of this round may have absorbed it.
                    if !self.used.contains(&starter.id) {
                        self.build_from(starter, pool)?;
                    }
                }
            }

            if self.used.len() == used_before {
                tracing::warn!(
                    target: TRACING_TARGET_RESOLVE,
                    job_id = %first_unused.id,
                    "Partitioning made no progress, adopting the first unused job",
                );
                self.diagnostics.push(Diagnostic::ForcedAdoption {
                    job_id: first_unused.id.clone(),
                });
                self.used.insert(first_unused.id.clone());
            }
        }

        Ok((self.workflows, self.diagnostics))
    }

    fn build_from(&mut self, starter: &Arc<Job>, pool: &[Arc<Job>]) -> WorkflowResult<()> {
        let workflow = GraphAutoWirer::new(self.policy, &mut self.used, &mut self.synthetic_ids)
            .build(starter, pool)?;
        self.workflows.push(workflow);
        Ok(())
    }
}

/// Returns the unused jobs of `pool` whose inputs are not produced by any
/// other unused job, in pool order.
pub(crate) fn find_starter_jobs<'p>(
    pool: &'p [Arc<Job>],
    used: &HashSet<JobId>,
) -> Vec<&'p Arc<Job>> {
    let unused: Vec<_> = pool.iter().filter(|job| !used.contains(&job.id)).collect();

    let mut producers: HashMap<&Role, Vec<&JobId>> = HashMap::new();
    for job in &unused {
        for role in &job.outputs {
            producers.entry(role).or_default().push(&job.id);
        }
    }

    unused
        .into_iter()
        .filter(|job| {
            job.inputs.iter().all(|role| {
                producers
                    .get(role)
                    .is_none_or(|ids| ids.iter().all(|id| *id == &job.id))
            })
        })
        .collect()
}

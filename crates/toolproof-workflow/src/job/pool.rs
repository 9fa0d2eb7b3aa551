//! Versioned job pool document.

use std::collections::HashSet;

use semver::Version;
use serde::{Deserialize, Serialize};

use super::Job;
use crate::error::{WorkflowError, WorkflowResult};

/// The canonical, versioned container of jobs handed to resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPool {
    /// Schema version of this document.
    #[serde(default = "JobPool::current_version")]
    pub version: Version,
    /// Jobs available for wiring, in pool order.
    #[serde(default)]
    pub jobs: Vec<Job>,
}

/// Accepted top-level shapes: a versioned pool or a bare job array.
#[derive(Deserialize)]
#[serde(untagged)]
enum PoolRepr {
    Versioned(JobPool),
    Bare(Vec<Job>),
}

impl JobPool {
    /// Schema version written by this crate.
    pub const CURRENT_VERSION: Version = Version::new(1, 0, 0);

    fn current_version() -> Version {
        Self::CURRENT_VERSION
    }

    /// Creates a pool at the current schema version.
    pub fn new(jobs: impl IntoIterator<Item = Job>) -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            jobs: jobs.into_iter().collect(),
        }
    }

    /// Parses a pool from JSON and checks its version and job ids.
    ///
    /// A bare JSON array of jobs is accepted and treated as the current version.
    pub fn from_json(json: &str) -> WorkflowResult<Self> {
        let pool = match serde_json::from_str::<PoolRepr>(json) {
            Ok(PoolRepr::Versioned(pool)) => pool,
            Ok(PoolRepr::Bare(jobs)) => Self::new(jobs),
            // Re-parse as the canonical shape to surface a precise error.
            Err(_) => serde_json::from_str::<JobPool>(json)?,
        };

        pool.check_version()?;
        ensure_unique_ids(&pool.jobs)?;
        Ok(pool)
    }

    /// Serializes the pool to pretty-printed JSON.
    pub fn to_json(&self) -> WorkflowResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Fails unless the document shares the supported major version.
    pub fn check_version(&self) -> WorkflowResult<()> {
        if self.version.major != Self::CURRENT_VERSION.major {
            return Err(WorkflowError::UnsupportedSchemaVersion {
                found: self.version.clone(),
                expected: Self::CURRENT_VERSION,
            });
        }
        Ok(())
    }

    /// Returns the number of jobs.
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    /// Returns whether the pool has no jobs.
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

impl From<Vec<Job>> for JobPool {
    fn from(jobs: Vec<Job>) -> Self {
        Self::new(jobs)
    }
}

impl IntoIterator for JobPool {
    type IntoIter = std::vec::IntoIter<Job>;
    type Item = Job;

    fn into_iter(self) -> Self::IntoIter {
        self.jobs.into_iter()
    }
}

/// Fails with [`WorkflowError::DuplicateJobId`] on the first repeated id.
pub fn ensure_unique_ids<'a>(jobs: impl IntoIterator<Item = &'a Job>) -> WorkflowResult<()> {
    let mut seen = HashSet::new();
    for job in jobs {
        if !seen.insert(&job.id) {
            return Err(WorkflowError::DuplicateJobId {
                job_id: job.id.clone(),
            });
        }
    }
    Ok(())
}

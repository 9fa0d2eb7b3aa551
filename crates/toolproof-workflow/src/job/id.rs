//! Job identifier type.

use std::borrow::Borrow;
use std::collections::HashSet;

use derive_more::{Debug, Display, From, Into};
use serde::{Deserialize, Serialize};

use super::Role;

/// Unique identifier for a job, and for the workflow node that wraps it.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[derive(Debug, Display, From, Into)]
#[debug("{_0}")]
#[display("{_0}")]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    /// Creates a job id from any string.
    #[inline]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Creates the id of the `index`th synthetic `load_<role>` source job.
    pub fn synthetic(role: &Role, index: usize) -> Self {
        Self(format!("load_{role}-{index}"))
    }

    /// Returns the id as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for JobId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl AsRef<str> for JobId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for JobId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Hands out synthetic source ids for one resolution run.
///
/// Ids are numbered in the order sources are created, so a fixed pool always
/// yields the same ids. Numbers whose id is taken by a pool job are skipped.
#[derive(Debug, Default)]
pub(crate) struct SyntheticIds {
    next: usize,
    reserved: HashSet<JobId>,
}

impl SyntheticIds {
    /// Creates a generator that never returns an id in `reserved`.
    pub fn new(reserved: impl IntoIterator<Item = JobId>) -> Self {
        Self {
            next: 1,
            reserved: reserved.into_iter().collect(),
        }
    }

    /// Returns the next unused id for a source of `role`.
    pub fn next_for(&mut self, role: &Role) -> JobId {
        loop {
            let id = JobId::synthetic(role, self.next);
            self.next += 1;
            if !self.reserved.contains(&id) {
                return id;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthetic_ids_are_numbered() {
        let mut ids = SyntheticIds::new([]);

        assert_eq!(ids.next_for(&Role::from("p")).as_str(), "load_p-1");
        assert_eq!(ids.next_for(&Role::from("q")).as_str(), "load_q-2");
        assert_eq!(ids.next_for(&Role::from("p")).as_str(), "load_p-3");
    }

    #[test]
    fn test_synthetic_ids_skip_reserved() {
        let mut ids = SyntheticIds::new([JobId::from("load_p-1")]);
        assert_eq!(ids.next_for(&Role::from("p")).as_str(), "load_p-2");
    }

    #[test]
    fn test_serialization() {
        let id = JobId::from("docking");
        let serialized = serde_json::to_string(&id).unwrap();
        assert_eq!(serialized, "\"docking\"");
    }
}

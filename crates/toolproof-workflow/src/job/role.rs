//! Resource role references.
//!
//! A role names the kind of resource a job consumes or produces. Job records
//! have historically referenced roles in several shapes; all of them
//! deserialize into a [`Role`], which always serializes back as a plain string:
//!
//! ```json
//! ["candidate", {"role": {"name": "target"}}, {"displayName": "box"}]
//! ```

use std::borrow::Borrow;

use derive_more::{Debug, Display, From, Into};
use serde::{Deserialize, Serialize};

use crate::registry::ResourceType;

/// Name of a resource role flowing between jobs.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[derive(Debug, Display, From, Into)]
#[debug("{_0}")]
#[display("{_0}")]
#[serde(from = "RoleRepr", into = "String")]
pub struct Role(String);

impl Role {
    /// Creates a role from its name.
    #[inline]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the role name.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Role {
    fn from(name: &str) -> Self {
        Self(name.to_owned())
    }
}

impl From<&ResourceType> for Role {
    fn from(resource_type: &ResourceType) -> Self {
        Self(resource_type.display_name.clone())
    }
}

impl AsRef<str> for Role {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Role {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Accepted serialized shapes of a role reference.
#[derive(Deserialize)]
#[serde(untagged)]
enum RoleRepr {
    Name(String),
    Nested {
        role: NamedRole,
    },
    Resource {
        #[serde(rename = "displayName", alias = "display_name", alias = "name")]
        display_name: String,
    },
}

#[derive(Deserialize)]
struct NamedRole {
    name: String,
}

impl From<RoleRepr> for Role {
    fn from(repr: RoleRepr) -> Self {
        match repr {
            RoleRepr::Name(name) => Self(name),
            RoleRepr::Nested { role } => Self(role.name),
            RoleRepr::Resource { display_name } => Self(display_name),
        }
    }
}

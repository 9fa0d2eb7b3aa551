//! Producer tie-break policy.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Which producer feeds a consumer input when several nodes of one workflow
/// output the same role.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(AsRefStr, Display, EnumString, EnumIter)]
#[derive(Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ProducerPolicy {
    /// The earliest registered producer wins.
    #[default]
    FirstRegistered,
    /// The latest registered producer wins.
    MostRecent,
    /// A second producer of a role fails resolution.
    ///
    /// Only pool jobs count as producers here. A job that outputs a role
    /// already supplied by a synthetic `load_<role>` source is accepted; the
    /// source stays the producer of every later consumer of that role.
    Reject,
}

impl ProducerPolicy {
    /// Returns whether several producers of one role may coexist.
    #[must_use]
    pub fn allows_shared_roles(&self) -> bool {
        !matches!(self, Self::Reject)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn test_default_is_first_registered() {
        assert_eq!(ProducerPolicy::default(), ProducerPolicy::FirstRegistered);
    }

    #[test]
    fn test_string_round_trip() {
        for policy in ProducerPolicy::iter() {
            let parsed = ProducerPolicy::from_str(policy.as_ref()).unwrap();
            assert_eq!(parsed, policy);
        }
        assert_eq!(ProducerPolicy::MostRecent.to_string(), "most_recent");
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&ProducerPolicy::Reject).unwrap();
        assert_eq!(json, "\"reject\"");
    }
}

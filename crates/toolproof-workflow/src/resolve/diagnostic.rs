//! Resolution diagnostics.

use serde::{Deserialize, Serialize};
use strum::IntoStaticStr;

use crate::job::JobId;

/// A recoverable event raised while partitioning a job pool.
///
/// Both variants point at a cyclic job pool or a modeling error.
#[derive(Debug, Clone, PartialEq, Eq, IntoStaticStr, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(tag = "kind", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum Diagnostic {
    /// No starter existed, so the first unused job was chosen as one.
    ForcedStarter {
        /// The chosen job.
        job_id: JobId,
    },
    /// An iteration consumed no job, so the first unused job was marked used.
    ForcedAdoption {
        /// The adopted job.
        job_id: JobId,
    },
}

impl Diagnostic {
    /// Returns the diagnostic kind as a static string.
    pub fn kind(&self) -> &'static str {
        self.into()
    }

    /// Returns the job the diagnostic refers to.
    pub fn job_id(&self) -> &JobId {
        match self {
            Self::ForcedStarter { job_id } | Self::ForcedAdoption { job_id } => job_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_and_serialization() {
        let diagnostic = Diagnostic::ForcedStarter {
            job_id: JobId::from("d"),
        };
        assert_eq!(diagnostic.kind(), "forced_starter");
        assert_eq!(diagnostic.job_id().as_str(), "d");

        let json = serde_json::to_value(&diagnostic).unwrap();
        assert_eq!(json["kind"], "forced_starter");
        assert_eq!(json["jobId"], "d");
        assert!(json.get("job_id").is_none());

        let parsed: Diagnostic = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, diagnostic);
    }
}

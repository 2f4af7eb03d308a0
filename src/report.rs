//! The result of one adapter run: records, warnings and a status.
//!
//! A run either completes or is aborted by an [`AdapterError`]. An aborted
//! run still carries the records gathered before the failure, so the driver
//! can tell "partial success, keep these" apart from "nothing usable".

use crate::error::AdapterError;
use crate::models::ContestRecord;
use serde::{Deserialize, Serialize};

/// A non-fatal diagnostic for one page or record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    /// What the warning is about, e.g. `"page 3"` or `"record abc353"`.
    pub scope: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunStatus {
    Complete,
    Aborted { error: String },
}

impl RunStatus {
    pub fn aborted(error: &AdapterError) -> Self {
        RunStatus::Aborted {
            error: error.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub adapter: String,
    pub host: String,
    pub rid: i64,
    pub records: Vec<ContestRecord>,
    pub warnings: Vec<Warning>,
    #[serde(flatten)]
    pub status: RunStatus,
}

impl RunReport {
    pub fn is_complete(&self) -> bool {
        matches!(self.status, RunStatus::Complete)
    }

    /// `false` only when the run was aborted before producing anything.
    pub fn is_usable(&self) -> bool {
        self.is_complete() || !self.records.is_empty()
    }

    /// Upsert identities of all records, in encounter order.
    pub fn identities(&self) -> Vec<(String, String)> {
        self.records
            .iter()
            .map(|r| (r.host.clone(), r.key.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(status: RunStatus) -> RunReport {
        RunReport {
            adapter: "dmoj".into(),
            host: "dmoj.ca".into(),
            rid: -1,
            records: vec![],
            warnings: vec![],
            status,
        }
    }

    #[test]
    fn test_usability() {
        assert!(report(RunStatus::Complete).is_usable());

        let aborted = RunStatus::aborted(&AdapterError::Status {
            url: "https://dmoj.ca/api/v2/contests".into(),
            status: 502,
        });
        assert!(!report(aborted.clone()).is_usable());

        let json = r#"{"title":"T","url":"https://dmoj.ca/contest/t","start_time":1,"duration_in_secs":5,
                       "key":"t","host":"dmoj.ca","rid":-1,"timezone":"UTC"}"#;
        let mut partial = report(aborted);
        partial.records.push(serde_json::from_str(json).unwrap());
        assert!(partial.is_usable());
        assert!(!partial.is_complete());
    }

    #[test]
    fn test_status_is_flattened_in_json() {
        let json = serde_json::to_value(report(RunStatus::Aborted {
            error: "boom".into(),
        }))
        .unwrap();
        assert_eq!(json["status"], "aborted");
        assert_eq!(json["error"], "boom");

        let json = serde_json::to_value(report(RunStatus::Complete)).unwrap();
        assert_eq!(json["status"], "complete");
    }
}

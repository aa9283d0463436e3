//! Job status interpretation
//!
//! Maps the output of `kubectl get job -o json` onto [`KubernetesJobStatus`].
//! Classification walks [`CLASSIFICATION_RULES`] in order and the first rule
//! that matches wins:
//!
//! 1. a `Failed` condition set to `True` -> `Failed`
//! 2. a `Complete` condition set to `True` -> `Complete`
//! 3. `active > 0` -> `Active`
//! 4. `succeeded > 0` -> `Complete`
//!
//! Anything else is `Unknown` without an error. Executor and parse failures
//! are returned as errors and always stand for `Unknown`.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use super::resources::{JobResource, JobStatusDocument};
use crate::executor::{ExecError, ExecOutput};
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KubernetesJobStatus {
    Active,
    Complete,
    Failed,
    Unknown,
}

impl KubernetesJobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            KubernetesJobStatus::Active => "Active",
            KubernetesJobStatus::Complete => "Complete",
            KubernetesJobStatus::Failed => "Failed",
            KubernetesJobStatus::Unknown => "Unknown",
        }
    }

    /// Complete and Failed jobs will not change state again
    pub fn is_terminal(&self) -> bool {
        matches!(self, KubernetesJobStatus::Complete | KubernetesJobStatus::Failed)
    }

    /// Status paired with an interpretation outcome; every error means `Unknown`.
    pub fn from_outcome(outcome: &Result<KubernetesJobStatus>) -> Self {
        match outcome {
            Ok(status) => *status,
            Err(_) => KubernetesJobStatus::Unknown,
        }
    }
}

impl fmt::Display for KubernetesJobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single classification step; `None` defers to the next rule.
pub type ClassificationRule = fn(&JobStatusDocument) -> Option<KubernetesJobStatus>;

/// Rules in precedence order
pub const CLASSIFICATION_RULES: &[(&str, ClassificationRule)] = &[
    ("failed-condition", failed_condition),
    ("complete-condition", complete_condition),
    ("active-pods", active_pods),
    ("succeeded-pods", succeeded_pods),
];

fn failed_condition(doc: &JobStatusDocument) -> Option<KubernetesJobStatus> {
    doc.conditions()
        .iter()
        .any(|c| c.is_true("Failed"))
        .then_some(KubernetesJobStatus::Failed)
}

fn complete_condition(doc: &JobStatusDocument) -> Option<KubernetesJobStatus> {
    doc.conditions()
        .iter()
        .any(|c| c.is_true("Complete"))
        .then_some(KubernetesJobStatus::Complete)
}

fn active_pods(doc: &JobStatusDocument) -> Option<KubernetesJobStatus> {
    (doc.active.unwrap_or(0) > 0).then_some(KubernetesJobStatus::Active)
}

// Counters alone are enough to call a job complete, even mid-way through a
// multi-pod run when `active` is missing.
fn succeeded_pods(doc: &JobStatusDocument) -> Option<KubernetesJobStatus> {
    (doc.succeeded.unwrap_or(0) > 0).then_some(KubernetesJobStatus::Complete)
}

/// Classify an already parsed status document
pub fn classify(doc: &JobStatusDocument) -> KubernetesJobStatus {
    for (name, rule) in CLASSIFICATION_RULES {
        if let Some(status) = rule(doc) {
            debug!(rule = *name, %status, "job status classified");
            return status;
        }
    }
    KubernetesJobStatus::Unknown
}

/// Parse raw `kubectl get job -o json` output and classify it
pub fn parse_job_status(stdout: &[u8]) -> Result<KubernetesJobStatus> {
    let resource: JobResource = serde_json::from_slice(stdout)?;
    Ok(classify(&resource.status.unwrap_or_default()))
}

/// Turn an executor result for a job query into a lifecycle status.
///
/// An executor error is handed back as-is inside [`Error::Execution`],
/// regardless of what was written to stdout.
pub fn interpret_job_status(
    output: std::result::Result<ExecOutput, ExecError>,
) -> Result<KubernetesJobStatus> {
    let output = output.map_err(Error::Execution)?;
    parse_job_status(&output.stdout)
}

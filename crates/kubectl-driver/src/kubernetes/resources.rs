use serde::{Deserialize, Serialize};

/// Envelope of `kubectl get job <name> -o json`; only `status` is read.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobResource {
    #[serde(default)]
    pub status: Option<JobStatusDocument>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStatusDocument {
    #[serde(default)]
    pub active: Option<i32>,
    #[serde(default)]
    pub succeeded: Option<i32>,
    #[serde(default)]
    pub failed: Option<i32>,
    #[serde(default)]
    pub completion_time: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub conditions: Option<Vec<JobCondition>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobCondition {
    #[serde(rename = "type", default)]
    pub type_: String,
    /// "True", "False" or "Unknown"
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub last_probe_time: Option<String>,
    #[serde(default)]
    pub last_transition_time: Option<String>,
}

impl JobStatusDocument {
    pub fn conditions(&self) -> &[JobCondition] {
        self.conditions.as_deref().unwrap_or(&[])
    }
}

impl JobCondition {
    /// True when the condition has the given type and is currently set
    pub fn is_true(&self, type_: &str) -> bool {
        self.type_ == type_ && self.status == "True"
    }
}

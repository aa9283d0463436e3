//! Argument construction for kubectl invocations
//!
//! Every builder is a pure function: no validation, no I/O, and the same
//! inputs always produce the same argv. Label maps are sorted by key before
//! emission so unordered inputs still yield one canonical command line.

use std::collections::BTreeMap;
use std::time::Duration;

/// Resource kinds removed by a bulk delete
pub const DELETE_ALL_KINDS: &str = "all,ing";

/// A fully built invocation for the external tool
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandSpec {
    pub args: Vec<String>,
    /// `KEY=VALUE` overrides; `None` inherits the caller's environment untouched
    pub env: Option<Vec<String>>,
    pub stdin: String,
}

impl CommandSpec {
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
            env: None,
            stdin: String::new(),
        }
    }

    pub fn with_env(mut self, env: Option<Vec<String>>) -> Self {
        self.env = env;
        self
    }

    pub fn with_stdin(mut self, stdin: impl Into<String>) -> Self {
        self.stdin = stdin.into();
        self
    }

    /// Environment overrides as a slice, empty when none are set
    pub fn env_slice(&self) -> &[String] {
        self.env.as_deref().unwrap_or(&[])
    }
}

/// Render a timeout the way kubectl expects it, rounded to whole seconds (`5s`)
pub fn format_timeout(timeout: Duration) -> String {
    let rounded = timeout
        .as_secs()
        .saturating_add(u64::from(timeout.subsec_nanos() >= 500_000_000));
    format!("{}s", rounded)
}

/// `-n <namespace> rollout status <resource> --timeout <N>s`
pub fn rollout_status_command(
    timeout: Duration,
    resource_name: &str,
    namespace: &str,
) -> CommandSpec {
    CommandSpec::new([
        "-n".to_string(),
        namespace.to_string(),
        "rollout".to_string(),
        "status".to_string(),
        resource_name.to_string(),
        "--timeout".to_string(),
        format_timeout(timeout),
    ])
}

/// `-n <namespace> get job <job> -o json`
pub fn job_status_command(job_name: &str, namespace: &str) -> CommandSpec {
    CommandSpec::new(["-n", namespace, "get", "job", job_name, "-o", "json"])
}

/// `-n <namespace> delete all,ing [-l key=value]*`
///
/// With no labels (or an empty map) the command deletes every matching
/// resource kind in the namespace. Guarding against that is up to the caller.
pub fn delete_all_resources_by_label_command<I, K, V>(
    namespace: &str,
    labels: Option<I>,
) -> CommandSpec
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut args = vec![
        "-n".to_string(),
        namespace.to_string(),
        "delete".to_string(),
        DELETE_ALL_KINDS.to_string(),
    ];

    let sorted: BTreeMap<String, String> = labels
        .into_iter()
        .flatten()
        .map(|(key, value)| (key.as_ref().to_string(), value.as_ref().to_string()))
        .collect();

    for (key, value) in sorted {
        args.push("-l".to_string());
        args.push(format!("{}={}", key, value));
    }

    CommandSpec::new(args)
}

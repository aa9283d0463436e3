use std::time::Duration;
use tracing::{debug, info, warn};

use super::command::{
    delete_all_resources_by_label_command, job_status_command, rollout_status_command, CommandSpec,
};
use super::status::{interpret_job_status, KubernetesJobStatus};
use crate::config::KubectlConfig;
use crate::executor::{ExecError, ExecOutput, OsExecutor};
use crate::{Error, Result};

pub const DEFAULT_BINARY: &str = "kubectl";

/// Drives the kubectl binary through an injected executor.
///
/// Holds only immutable settings, so one instance can be shared between
/// concurrent callers. Nothing here retries or polls; callers own that.
#[derive(Debug, Clone)]
pub struct Kubectl<E> {
    executor: E,
    binary: String,
    kubeconfig_path: String,
    base_domain: String,
}

impl<E: OsExecutor> Kubectl<E> {
    /// An empty `kubeconfig_path` leaves the tool's own config discovery alone.
    pub fn new(
        executor: E,
        kubeconfig_path: impl Into<String>,
        base_domain: impl Into<String>,
    ) -> Self {
        Self {
            executor,
            binary: DEFAULT_BINARY.to_string(),
            kubeconfig_path: kubeconfig_path.into(),
            base_domain: base_domain.into(),
        }
    }

    pub fn from_config(executor: E, config: &KubectlConfig) -> Self {
        Self::new(executor, config.kubeconfig_path.clone(), config.base_domain.clone())
            .with_binary(config.binary.clone())
    }

    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }

    pub fn base_domain(&self) -> &str {
        &self.base_domain
    }

    /// In-cluster DNS name of a service, e.g. `api.default.svc.cluster.local`
    pub fn service_hostname(&self, service: &str, namespace: &str) -> String {
        if self.base_domain.is_empty() {
            format!("{}.{}", service, namespace)
        } else {
            format!("{}.{}.{}", service, namespace, self.base_domain)
        }
    }

    fn env(&self) -> Option<Vec<String>> {
        if self.kubeconfig_path.is_empty() {
            None
        } else {
            Some(vec![format!("KUBECONFIG={}", self.kubeconfig_path)])
        }
    }

    async fn run(&self, spec: CommandSpec) -> std::result::Result<ExecOutput, ExecError> {
        let spec = spec.with_env(self.env());
        debug!(binary = %self.binary, args = ?spec.args, "running kubectl");
        self.executor
            .execute(&self.binary, &spec.args, spec.env_slice(), &spec.stdin)
            .await
    }

    /// Wait for a rollout and return the tool's stdout untouched
    pub async fn rollout_status(
        &self,
        timeout: Duration,
        resource_name: &str,
        namespace: &str,
    ) -> Result<Vec<u8>> {
        let output = self
            .run(rollout_status_command(timeout, resource_name, namespace))
            .await?;
        Ok(output.stdout)
    }

    /// Classify a job; any error means the status is `Unknown`.
    pub async fn job_status(&self, job_name: &str, namespace: &str) -> Result<KubernetesJobStatus> {
        let output = self.run(job_status_command(job_name, namespace)).await;
        let status = interpret_job_status(output);
        match &status {
            Ok(status) => info!(job = job_name, namespace, %status, "job status"),
            Err(Error::Execution(e)) => {
                warn!(job = job_name, namespace, error = %e, "job status query failed")
            }
            Err(e) => {
                warn!(job = job_name, namespace, error = %e, "job status output unreadable")
            }
        }
        status
    }

    /// Delete `all,ing` resources matching every given label.
    ///
    /// Without labels this removes all of those resources in the namespace.
    pub async fn delete_all_resources_by_label<I, K, V>(
        &self,
        namespace: &str,
        labels: Option<I>,
    ) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let spec = delete_all_resources_by_label_command(namespace, labels);
        if spec.args.len() == 4 {
            warn!(namespace, "deleting resources without a label selector");
        }
        self.run(spec).await?;
        Ok(())
    }
}

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::kubernetes::DEFAULT_BINARY;

pub const DEFAULT_BASE_DOMAIN: &str = "svc.cluster.local";
pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub kubectl: KubectlConfig,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KubectlConfig {
    pub binary: String,
    /// Empty means kubectl falls back to its own lookup
    #[serde(default)]
    pub kubeconfig_path: String,
    pub base_domain: String,
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

impl Config {
    pub fn load() -> crate::Result<Self> {
        // Load environment variables from .env file if it exists
        check_env_file(dotenvy::dotenv())?;

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key lookup; `load` uses the process environment.
    pub fn from_lookup<F>(lookup: F) -> crate::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Config {
            kubectl: KubectlConfig {
                binary: lookup("KUBECTL_BINARY").unwrap_or_else(|| DEFAULT_BINARY.to_string()),
                kubeconfig_path: lookup("KUBECONFIG").unwrap_or_default(),
                base_domain: lookup("KUBE_BASE_DOMAIN")
                    .unwrap_or_else(|| DEFAULT_BASE_DOMAIN.to_string()),
            },
            log_level: lookup("LOG_LEVEL").unwrap_or_else(default_log_level),
        };

        if config.kubectl.binary.trim().is_empty() {
            return Err(crate::Error::Config("KUBECTL_BINARY must not be empty".to_string()));
        }

        Ok(config)
    }

    /// Load variables from a specific env file. A missing file is not an error.
    pub fn load_env_file(path: impl AsRef<Path>) -> crate::Result<()> {
        check_env_file(dotenvy::from_path(path))
    }

    /// Settings that load fine but are probably not what was meant.
    ///
    /// Returned rather than logged so the caller can report them once logging is up.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.kubectl.base_domain.is_empty() {
            warnings.push(
                "KUBE_BASE_DOMAIN is empty. Service hostnames will stop at the namespace."
                    .to_string(),
            );
        }
        warnings
    }
}

fn check_env_file<T>(result: dotenvy::Result<T>) -> crate::Result<()> {
    match result {
        Ok(_) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(dotenvy::Error::Io(e)) => Err(crate::Error::Io(e)),
        Err(e) => Err(crate::Error::Config(format!("invalid env file: {}", e))),
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            kubectl: KubectlConfig::default(),
            log_level: default_log_level(),
        }
    }
}

impl Default for KubectlConfig {
    fn default() -> Self {
        Self {
            binary: DEFAULT_BINARY.to_string(),
            kubeconfig_path: String::new(),
            base_domain: DEFAULT_BASE_DOMAIN.to_string(),
        }
    }
}

pub mod config;
pub mod executor;
pub mod kubernetes;

pub use executor::{ExecError, ExecOutput, OsExecutor, ProcessExecutor};
pub use kubernetes::{CommandSpec, Kubectl, KubernetesJobStatus};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Execution error: {0}")]
    Execution(#[from] ExecError),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

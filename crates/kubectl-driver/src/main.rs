//! Command-line front end for the kubectl driver
//!
//! Run with: cargo run --bin kubectl-driver -- [OPTIONS] <COMMAND>

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::collections::BTreeMap;
use std::io::{self, Write};
use std::time::Duration;
use tracing::{info, warn};

use kubectl_driver::{config::Config, Kubectl, ProcessExecutor};

#[derive(Parser)]
#[command(author, version, about = "Run kubectl operations and interpret their results", long_about = None)]
struct Cli {
    /// Log level (debug, info, warn, error); defaults to LOG_LEVEL or info
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Path to a kubeconfig file, passed to kubectl as KUBECONFIG
    #[arg(long, global = true)]
    kubeconfig: Option<String>,

    /// kubectl binary to invoke
    #[arg(long, global = true)]
    binary: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Wait for a rollout to finish and print kubectl's output
    RolloutStatus {
        /// Resource to watch, e.g. deployment/foo
        resource: String,

        #[arg(short, long, default_value = "default")]
        namespace: String,

        /// Timeout in seconds
        #[arg(short, long, default_value_t = 300)]
        timeout: u64,
    },

    /// Print the lifecycle status of a job
    JobStatus {
        job: String,

        #[arg(short, long, default_value = "default")]
        namespace: String,
    },

    /// Delete all,ing resources in a namespace matching the given labels
    DeleteByLabel {
        #[arg(short, long)]
        namespace: String,

        /// Label selector entry, repeatable
        #[arg(short = 'l', long = "label", value_parser = parse_label)]
        labels: Vec<(String, String)>,
    },
}

fn parse_label(raw: &str) -> std::result::Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got '{}'", raw)),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load()?;
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    if let Some(path) = cli.kubeconfig {
        config.kubectl.kubeconfig_path = path;
    }
    if let Some(binary) = cli.binary {
        config.kubectl.binary = binary;
    }

    // Initialize logging
    let log_filter = format!("kubectl_driver={},warn", config.log_level);
    tracing_subscriber::fmt()
        .with_env_filter(log_filter)
        .with_writer(io::stderr)
        .init();

    for message in config.warnings() {
        warn!("{}", message);
    }

    info!(binary = %config.kubectl.binary, "using kubectl");
    let kubectl = Kubectl::from_config(ProcessExecutor::new(), &config.kubectl);

    match cli.command {
        Commands::RolloutStatus { resource, namespace, timeout } => {
            let stdout = kubectl
                .rollout_status(Duration::from_secs(timeout), &resource, &namespace)
                .await?;
            io::stdout().write_all(&stdout)?;
        }
        Commands::JobStatus { job, namespace } => {
            let status = kubectl.job_status(&job, &namespace).await?;
            println!("{}", status);
        }
        Commands::DeleteByLabel { namespace, labels } => {
            let labels: BTreeMap<String, String> = labels.into_iter().collect();
            kubectl
                .delete_all_resources_by_label(&namespace, Some(labels))
                .await?;
        }
    }

    Ok(())
}

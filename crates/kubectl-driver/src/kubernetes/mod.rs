pub mod command;
pub mod kubectl;
pub mod resources;
pub mod status;

pub use command::{
    delete_all_resources_by_label_command, format_timeout, job_status_command,
    rollout_status_command, CommandSpec,
};
pub use kubectl::{Kubectl, DEFAULT_BINARY};
pub use resources::{JobCondition, JobResource, JobStatusDocument};
pub use status::{classify, interpret_job_status, parse_job_status, KubernetesJobStatus};

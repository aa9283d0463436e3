#![cfg(unix)]

use kubectl_driver::{
    kubernetes::KubernetesJobStatus, ExecError, Kubectl, OsExecutor, ProcessExecutor,
};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::Mutex;

// Serialized: a fork in a sibling test can hold a fresh script open (ETXTBSY).
static SERIAL: Mutex<()> = Mutex::const_new(());

fn strings(args: &[&str]) -> Vec<String> {
    args.iter().map(|s| s.to_string()).collect()
}

/// Write an executable stand-in for kubectl into the temp dir
fn fake_kubectl(name: &str, body: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("kubectl-driver-{}-{}", name, std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join("kubectl");
    fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

#[tokio::test]
async fn test_process_executor_captures_stdout() {
    let _guard = SERIAL.lock().await;
    let output = ProcessExecutor::new()
        .execute("sh", &strings(&["-c", "echo hello; echo oops >&2"]), &[], "")
        .await
        .unwrap();
    assert_eq!(output.stdout, b"hello\n");
    assert_eq!(output.stderr, b"oops\n");
}

#[tokio::test]
async fn test_process_executor_writes_stdin() {
    let _guard = SERIAL.lock().await;
    let output = ProcessExecutor::new()
        .execute("sh", &strings(&["-c", "cat"]), &[], "apiVersion: v1\nkind: Namespace\n")
        .await
        .unwrap();
    assert_eq!(output.stdout, b"apiVersion: v1\nkind: Namespace\n");
}

#[tokio::test]
async fn test_process_executor_applies_env_overrides() {
    let _guard = SERIAL.lock().await;
    let output = ProcessExecutor::new()
        .execute(
            "sh",
            &strings(&["-c", "printf '%s' \"$KUBECONFIG\""]),
            &strings(&["KUBECONFIG=/tmp/kubeconfig"]),
            "",
        )
        .await
        .unwrap();
    assert_eq!(output.stdout, b"/tmp/kubeconfig");
}

#[tokio::test]
async fn test_process_executor_reports_exit_code() {
    let _guard = SERIAL.lock().await;
    let result = ProcessExecutor::new()
        .execute("sh", &strings(&["-c", "echo partial; echo denied >&2; exit 3"]), &[], "")
        .await;

    match result {
        Err(ExecError::Exit { code, stdout, stderr, .. }) => {
            assert_eq!(code, Some(3));
            assert_eq!(stdout, b"partial\n");
            assert_eq!(stderr, b"denied\n");
        }
        other => panic!("expected exit error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_kubectl_against_fake_binary() {
    let _guard = SERIAL.lock().await;
    let binary = fake_kubectl(
        "job",
        r#"if [ "$*" = "-n default get job foo -o json" ] && [ "$KUBECONFIG" = "/etc/kube/config" ]; then
  echo '{"status": {"conditions": [{"type": "Failed", "status": "True"}], "succeeded": 1}}'
else
  echo "unexpected: $*" >&2
  exit 1
fi"#,
    );

    let kubectl = Kubectl::new(ProcessExecutor::new(), "/etc/kube/config", "svc.cluster.local")
        .with_binary(binary.to_string_lossy());
    let status = kubectl.job_status("foo", "default").await.unwrap();
    assert_eq!(status, KubernetesJobStatus::Failed);
}

#[tokio::test]
async fn test_rollout_failure_from_fake_binary() {
    let _guard = SERIAL.lock().await;
    let binary = fake_kubectl(
        "rollout",
        r#"echo 'error: timed out waiting for the condition' >&2
exit 1"#,
    );

    let kubectl =
        Kubectl::new(ProcessExecutor::new(), "", "").with_binary(binary.to_string_lossy());
    let result = kubectl
        .rollout_status(Duration::from_secs(1), "deployment/foo", "default")
        .await;
    match result {
        Err(kubectl_driver::Error::Execution(ExecError::Exit { code, .. })) => {
            assert_eq!(code, Some(1))
        }
        other => panic!("expected exit error, got {:?}", other),
    }
}

//! Command execution layer.
//!
//! Everything with side effects outside the library goes through a
//! [`CommandRunner`]. The packaging pipeline only decides *what* to run; a
//! runner decides *how*.
//!
//! # Runners
//!
//! - [`ProcessRunner`] - spawns real processes via `tokio::process`
//! - [`RecordingRunner`] - records invocations without running them (dry runs)

mod shell;
mod types;

pub use shell::{ProcessRunner, shell_invocation};
pub use types::*;

use std::future::Future;

use tokio::sync::Mutex;
use tracing::info;

/// Executes one invocation and reports its trimmed stdout.
///
/// Implementations must observe process exit before returning, the pipeline
/// relies on that for phase ordering.
pub trait CommandRunner: Send + Sync {
  fn run(&self, invocation: &Invocation) -> impl Future<Output = Result<String, ExecuteError>> + Send;
}

impl<R: CommandRunner> CommandRunner for &R {
  fn run(&self, invocation: &Invocation) -> impl Future<Output = Result<String, ExecuteError>> + Send {
    (**self).run(invocation)
  }
}

/// A rule making [`RecordingRunner`] fail invocations whose rendering contains `needle`.
#[derive(Debug, Clone)]
struct FailureRule {
  needle: String,
  code: i32,
}

/// Records invocations instead of running them.
///
/// Used for dry runs, and in tests to observe exactly what a pipeline would
/// execute. A failure rule can be attached to simulate a failing command.
#[derive(Debug, Default)]
pub struct RecordingRunner {
  calls: Mutex<Vec<Invocation>>,
  failure: Option<FailureRule>,
}

impl RecordingRunner {
  pub fn new() -> Self {
    Self::default()
  }

  /// Fail (with `code`) any invocation whose script or command line contains `needle`.
  pub fn failing_on(needle: impl Into<String>, code: i32) -> Self {
    Self {
      calls: Mutex::new(Vec::new()),
      failure: Some(FailureRule {
        needle: needle.into(),
        code,
      }),
    }
  }

  /// Invocations received so far, in order. Failed invocations are included.
  pub async fn invocations(&self) -> Vec<Invocation> {
    self.calls.lock().await.clone()
  }

  /// Scripts of the received invocations (the `-c` argument, or the full command line).
  pub async fn scripts(&self) -> Vec<String> {
    self
      .calls
      .lock()
      .await
      .iter()
      .map(|inv| inv.script().map(str::to_string).unwrap_or_else(|| inv.to_string()))
      .collect()
  }
}

impl CommandRunner for RecordingRunner {
  async fn run(&self, invocation: &Invocation) -> Result<String, ExecuteError> {
    let rendered = invocation.script().map(str::to_string).unwrap_or_else(|| invocation.to_string());
    self.calls.lock().await.push(invocation.clone());

    if let Some(rule) = self.failure.as_ref().filter(|r| rendered.contains(&r.needle)) {
      return Err(ExecuteError::CmdFailed {
        cmd: rendered,
        code: Some(rule.code),
        stderr: String::new(),
      });
    }

    info!(cmd = %rendered, "dry run");
    Ok(String::new())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn recording_runner_keeps_order() {
    let runner = RecordingRunner::new();
    runner.run(&shell_invocation("sh", "first")).await.unwrap();
    runner.run(&shell_invocation("sh", "second")).await.unwrap();

    assert_eq!(runner.scripts().await, vec!["first", "second"]);
    assert_eq!(runner.invocations().await.len(), 2);
  }

  #[tokio::test]
  async fn recording_runner_injects_failure() {
    let runner = RecordingRunner::failing_on("npm run build", 2);
    assert!(runner.run(&shell_invocation("sh", "npm install")).await.is_ok());

    let err = runner.run(&shell_invocation("sh", "npm run build")).await.unwrap_err();
    assert_eq!(err.exit_code(), Some(2));
    assert_eq!(runner.scripts().await.len(), 2);
  }

  #[tokio::test]
  async fn runner_works_through_reference() {
    let runner = RecordingRunner::new();
    let by_ref = &runner;
    by_ref.run(&shell_invocation("sh", "echo")).await.unwrap();
    assert_eq!(runner.scripts().await, vec!["echo"]);
  }
}

//! Process execution.
//!
//! [`ProcessRunner`] spawns each [`Invocation`] with `tokio::process`,
//! waits for it to exit and reports captured output.

use tokio::process::Command;
use tracing::{debug, info};

use super::CommandRunner;
use super::types::{ExecuteError, Invocation};

/// Runs invocations as real child processes.
///
/// The child inherits the current process environment, with the
/// invocation's `env` merged on top. Stdout and stderr are captured; stdout
/// is returned trimmed, stderr is attached to [`ExecuteError::CmdFailed`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
  async fn run(&self, invocation: &Invocation) -> Result<String, ExecuteError> {
    let rendered = invocation.script().map(str::to_string).unwrap_or_else(|| invocation.to_string());
    info!(cmd = %rendered, "executing command");

    let mut command = Command::new(&invocation.program);
    command.args(&invocation.args).envs(&invocation.env);
    if let Some(cwd) = &invocation.cwd {
      command.current_dir(cwd);
    }

    debug!(program = %invocation.program, working_dir = ?invocation.cwd, "spawning process");

    let output = command.output().await.map_err(|source| ExecuteError::Spawn {
      program: invocation.program.clone(),
      source,
    })?;

    let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

    if !output.status.success() {
      if !stderr.is_empty() {
        debug!(stderr = %stderr, "command stderr");
      }
      if !stdout.is_empty() {
        debug!(stdout = %stdout, "command stdout");
      }

      return Err(ExecuteError::CmdFailed {
        cmd: rendered,
        code: output.status.code(),
        stderr,
      });
    }

    if !stdout.is_empty() {
      debug!(stdout = %stdout, "command output");
    }

    Ok(stdout)
  }
}

/// Build a `<shell> -c <script>` invocation.
///
/// Every generated command uses POSIX syntax, so any override is expected
/// to be a POSIX-compatible shell accepting `-c`.
pub fn shell_invocation(shell: &str, script: &str) -> Invocation {
  Invocation::new(shell).arg("-c").arg(script)
}

//! Types for command execution.
//!
//! This module defines the invocation handed to a [`CommandRunner`] and the
//! errors the execution layer reports back.
//!
//! [`CommandRunner`]: super::CommandRunner

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// Errors that can occur while running external commands.
#[derive(Debug, Error)]
pub enum ExecuteError {
  /// Command exited unsuccessfully. `code` is `None` when killed by a signal.
  #[error("command failed with exit code {code:?}: {cmd}")]
  CmdFailed {
    cmd: String,
    code: Option<i32>,
    stderr: String,
  },

  /// The program could not be started at all.
  #[error("failed to spawn {program}: {source}")]
  Spawn {
    program: String,
    #[source]
    source: std::io::Error,
  },

  /// I/O error while preparing the environment.
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
}

impl ExecuteError {
  /// Exit code of a failed command, if there was one.
  pub fn exit_code(&self) -> Option<i32> {
    match self {
      ExecuteError::CmdFailed { code, .. } => *code,
      _ => None,
    }
  }
}

/// A single process spawn request.
///
/// Environment adapters translate command sets into invocations; runners
/// execute them. `env` is merged over the inherited process environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Invocation {
  pub program: String,
  pub args: Vec<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub cwd: Option<PathBuf>,
  #[serde(skip_serializing_if = "BTreeMap::is_empty")]
  pub env: BTreeMap<String, String>,
}

impl Invocation {
  pub fn new(program: impl Into<String>) -> Self {
    Self {
      program: program.into(),
      args: Vec::new(),
      cwd: None,
      env: BTreeMap::new(),
    }
  }

  pub fn arg(mut self, arg: impl Into<String>) -> Self {
    self.args.push(arg.into());
    self
  }

  pub fn args<I, S>(mut self, args: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.args.extend(args.into_iter().map(Into::into));
    self
  }

  pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
    self.cwd = Some(dir.into());
    self
  }

  pub fn envs(mut self, vars: &BTreeMap<String, String>) -> Self {
    for (key, value) in vars {
      self.env.insert(key.clone(), value.clone());
    }
    self
  }

  /// The trailing shell script, for invocations of the form `<shell> -c <script>`.
  pub fn script(&self) -> Option<&str> {
    let pos = self.args.iter().position(|a| a == "-c")?;
    self.args.get(pos + 1).map(String::as_str)
  }
}

impl fmt::Display for Invocation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.program)?;
    for arg in &self.args {
      write!(f, " {}", crate::command::shell_quote(arg))?;
    }
    Ok(())
  }
}

//! Build environment adapters.
//!
//! An environment decides where the commands of a build run and what the
//! module and output paths look like from there.
//!
//! - [`ContainerEnvironment`] - runs each phase in a throwaway container with
//!   the module and output directory mounted at fixed points
//! - [`LocalEnvironment`] - runs each command on the host, inside the module

mod container;
mod local;

pub use container::ContainerEnvironment;
pub use local::LocalEnvironment;

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::asset::{ConstructContext, ModuleRef, OutputDir};
use crate::command::{CommandSet, shell_quote};
use crate::execute::Invocation;

/// The two places a build can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EnvironmentKind {
  Container,
  Local,
}

impl EnvironmentKind {
  pub const ALL: [EnvironmentKind; 2] = [EnvironmentKind::Container, EnvironmentKind::Local];

  pub fn as_str(self) -> &'static str {
    match self {
      EnvironmentKind::Container => "container",
      EnvironmentKind::Local => "local",
    }
  }
}

impl fmt::Display for EnvironmentKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for EnvironmentKind {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "container" | "docker" => Ok(EnvironmentKind::Container),
      "local" => Ok(EnvironmentKind::Local),
      other => Err(format!("unknown environment: {} (expected container or local)", other)),
    }
  }
}

/// Module and output paths as seen by the commands of a build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathLayout {
  pub source: String,
  pub output: String,
}

impl PathLayout {
  pub fn new(source: impl Into<String>, output: impl Into<String>) -> Self {
    Self {
      source: source.into(),
      output: output.into(),
    }
  }

  /// Shell-ready source root.
  pub fn source_dir(&self) -> String {
    shell_quote(&self.source)
  }

  /// Shell-ready output root.
  pub fn output_dir(&self) -> String {
    shell_quote(&self.output)
  }

  /// Shell-ready path of `rel` below the source root. `rel` may end in a glob.
  pub fn source_entry(&self, rel: &str) -> String {
    format!("{}/{}", self.source_dir(), rel)
  }
}

/// Where and how the commands of a build run.
pub trait Environment: Send + Sync + fmt::Debug {
  fn kind(&self) -> EnvironmentKind;

  /// Paths the strategy should reference in its commands.
  fn layout(&self, module: &ModuleRef, output: &OutputDir) -> PathLayout;

  /// Host directories that must exist before the first phase runs.
  fn host_dirs(&self, _output: &OutputDir) -> Vec<PathBuf> {
    Vec::new()
  }

  /// Translate one phase's commands into the invocations that realize it, in order.
  fn invocations(
    &self,
    commands: &CommandSet,
    module: &ModuleRef,
    output: &OutputDir,
    context: Option<&ConstructContext>,
  ) -> Vec<Invocation>;
}

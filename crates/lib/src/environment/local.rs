//! Builds on the invoking host.
//!
//! Every command runs as `<shell> -c <command>` with the module directory as
//! working directory. The host environment is inherited so the toolchain on
//! `PATH` is used; construct context variables are added on top. Commands of
//! a phase run one at a time and the first failure stops the phase.

use serde::Serialize;

use super::{Environment, EnvironmentKind, PathLayout};
use crate::asset::{ConstructContext, ModuleRef, OutputDir};
use crate::command::CommandSet;
use crate::consts::DEFAULT_LOCAL_SHELL;
use crate::execute::{Invocation, shell_invocation};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocalEnvironment {
  shell: String,
}

impl Default for LocalEnvironment {
  fn default() -> Self {
    Self {
      shell: DEFAULT_LOCAL_SHELL.to_string(),
    }
  }
}

impl LocalEnvironment {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_shell(mut self, shell: impl Into<String>) -> Self {
    self.shell = shell.into();
    self
  }

  pub fn shell(&self) -> &str {
    &self.shell
  }
}

impl Environment for LocalEnvironment {
  fn kind(&self) -> EnvironmentKind {
    EnvironmentKind::Local
  }

  fn layout(&self, module: &ModuleRef, output: &OutputDir) -> PathLayout {
    PathLayout::new(
      module.path().display().to_string(),
      output.path().display().to_string(),
    )
  }

  fn invocations(
    &self,
    commands: &CommandSet,
    module: &ModuleRef,
    _output: &OutputDir,
    context: Option<&ConstructContext>,
  ) -> Vec<Invocation> {
    commands
      .iter()
      .map(|cmd| {
        let inv = shell_invocation(&self.shell, cmd).current_dir(module.path());
        match context {
          Some(ctx) => inv.envs(ctx.vars()),
          None => inv,
        }
      })
      .collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::path::PathBuf;

  #[test]
  fn layout_uses_host_paths() {
    let env = LocalEnvironment::new();
    let layout = env.layout(&ModuleRef::new("/src/fn"), &OutputDir::new("/build/fn"));
    assert_eq!(layout.source, "/src/fn");
    assert_eq!(layout.output, "/build/fn");
  }

  #[test]
  fn one_invocation_per_command_in_module_dir() {
    let env = LocalEnvironment::new().with_shell("/bin/bash");
    let commands = CommandSet::from(["rm -fr node_modules", "rm -fr dist"]);
    let ctx = ConstructContext::new().with_var("STAGE", "dev");

    let invocations = env.invocations(&commands, &ModuleRef::new("/src/fn"), &OutputDir::new("/out"), Some(&ctx));

    assert_eq!(invocations.len(), 2);
    for (inv, cmd) in invocations.iter().zip(commands.iter()) {
      assert_eq!(inv.program, "/bin/bash");
      assert_eq!(inv.script(), Some(cmd.as_str()));
      assert_eq!(inv.cwd, Some(PathBuf::from("/src/fn")));
      assert_eq!(inv.env.get("STAGE").map(String::as_str), Some("dev"));
    }
  }

  #[test]
  fn no_host_dirs_needed() {
    assert!(LocalEnvironment::new().host_dirs(&OutputDir::new("/out")).is_empty());
  }
}

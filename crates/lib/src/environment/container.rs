//! Containerized builds.
//!
//! Each phase becomes one `<engine> run --rm` invocation. The module is
//! mounted at [`CONTAINER_INPUT_DIR`] and used as the working directory; the
//! output directory is mounted at [`CONTAINER_OUTPUT_DIR`]. The commands of
//! a phase are joined with `&&` and handed to `bash -c`, so the first
//! failing command ends the container with its exit status.

use std::path::PathBuf;

use serde::Serialize;

use super::{Environment, EnvironmentKind, PathLayout};
use crate::asset::{ConstructContext, ModuleRef, OutputDir};
use crate::command::CommandSet;
use crate::consts::{
  CONTAINER_INPUT_DIR, CONTAINER_OUTPUT_DIR, CONTAINER_SHELL, DEFAULT_CONTAINER_ENGINE, DEFAULT_CONTAINER_IMAGE,
};
use crate::execute::Invocation;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContainerEnvironment {
  engine: String,
  image: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  user: Option<String>,
}

impl Default for ContainerEnvironment {
  fn default() -> Self {
    Self {
      engine: DEFAULT_CONTAINER_ENGINE.to_string(),
      image: DEFAULT_CONTAINER_IMAGE.to_string(),
      user: None,
    }
  }
}

impl ContainerEnvironment {
  pub fn new(image: impl Into<String>) -> Self {
    Self {
      image: image.into(),
      ..Self::default()
    }
  }

  pub fn with_engine(mut self, engine: impl Into<String>) -> Self {
    self.engine = engine.into();
    self
  }

  /// Run the container as `user` (`uid[:gid]`), so artifacts are not root-owned.
  pub fn with_user(mut self, user: impl Into<String>) -> Self {
    self.user = Some(user.into());
    self
  }

  pub fn engine(&self) -> &str {
    &self.engine
  }

  pub fn image(&self) -> &str {
    &self.image
  }

  pub fn user(&self) -> Option<&str> {
    self.user.as_deref()
  }

  /// Arguments of `<engine> run` up to and including the image name.
  fn run_args(&self, module: &ModuleRef, output: &OutputDir, context: Option<&ConstructContext>) -> Vec<String> {
    let mut args = vec![
      "run".to_string(),
      "--rm".to_string(),
      "-v".to_string(),
      format!("{}:{}:delegated", module.path().display(), CONTAINER_INPUT_DIR),
      "-v".to_string(),
      format!("{}:{}:delegated", output.path().display(), CONTAINER_OUTPUT_DIR),
      "-w".to_string(),
      CONTAINER_INPUT_DIR.to_string(),
    ];

    if let Some(user) = &self.user {
      args.push("-u".to_string());
      args.push(user.clone());
    }

    if let Some(ctx) = context {
      for (key, value) in ctx.vars() {
        args.push("-e".to_string());
        args.push(format!("{}={}", key, value));
      }
    }

    args.push(self.image.clone());
    args
  }
}

impl Environment for ContainerEnvironment {
  fn kind(&self) -> EnvironmentKind {
    EnvironmentKind::Container
  }

  fn layout(&self, _module: &ModuleRef, _output: &OutputDir) -> PathLayout {
    PathLayout::new(CONTAINER_INPUT_DIR, CONTAINER_OUTPUT_DIR)
  }

  /// The engine would otherwise create a missing mount source as root.
  fn host_dirs(&self, output: &OutputDir) -> Vec<PathBuf> {
    vec![output.path().to_path_buf()]
  }

  fn invocations(
    &self,
    commands: &CommandSet,
    module: &ModuleRef,
    output: &OutputDir,
    context: Option<&ConstructContext>,
  ) -> Vec<Invocation> {
    if commands.is_empty() {
      return Vec::new();
    }

    let invocation = Invocation::new(&self.engine)
      .args(self.run_args(module, output, context))
      .arg(CONTAINER_SHELL)
      .arg("-c")
      .arg(commands.to_script());

    vec![invocation]
  }
}

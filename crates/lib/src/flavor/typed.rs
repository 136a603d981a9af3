//! Typed-script pairings.
//!
//! Sources are compiled before packaging and only the compiled output plus
//! production dependencies ship. The dependency directory is removed after
//! compiling and reinstalled production-only so build tooling (compiler,
//! type definitions) never ends up in the artifact.

use super::{BuildStrategy, Flavor, PlainScriptLocal, Toolchain};
use crate::command::CommandSet;
use crate::environment::PathLayout;

/// Install, compile, drop dev dependencies, reinstall production ones.
fn build_commands(toolchain: &Toolchain) -> CommandSet {
  CommandSet::from([
    toolchain.install(),
    toolchain.compile(),
    toolchain.remove_dependencies(),
    toolchain.reinstall_production(),
  ])
}

#[derive(Debug, Clone, Default)]
pub struct TypedScriptContainer {
  toolchain: Toolchain,
}

impl TypedScriptContainer {
  pub fn new(toolchain: Toolchain) -> Self {
    Self { toolchain }
  }
}

impl BuildStrategy for TypedScriptContainer {
  fn flavor(&self) -> Flavor {
    Flavor::TypedScript
  }

  fn build(&self, _layout: &PathLayout) -> CommandSet {
    build_commands(&self.toolchain)
  }

  fn post_build(&self, layout: &PathLayout) -> CommandSet {
    let out = layout.output_dir();
    CommandSet::from([
      format!("mkdir -p {}/", out),
      format!("cp -au {} {}/", layout.source_entry(&self.toolchain.dependency_dir), out),
      format!(
        "cp -au {} {}/",
        layout.source_entry(&format!("{}/*", self.toolchain.compiled_dir)),
        out
      ),
    ])
  }
}

#[derive(Debug, Clone, Default)]
pub struct TypedScriptLocal {
  base: PlainScriptLocal,
  toolchain: Toolchain,
}

impl TypedScriptLocal {
  pub fn new(toolchain: Toolchain) -> Self {
    Self {
      base: PlainScriptLocal::new(toolchain.clone()),
      toolchain,
    }
  }
}

impl BuildStrategy for TypedScriptLocal {
  fn flavor(&self) -> Flavor {
    Flavor::TypedScript
  }

  /// Local pre-build, then drop stale compiled output so the compile step
  /// regenerates it instead of merging into leftovers.
  fn pre_build(&self, layout: &PathLayout) -> CommandSet {
    let mut commands = self.base.pre_build(layout);
    commands.push(self.toolchain.remove_compiled());
    commands
  }

  fn build(&self, _layout: &PathLayout) -> CommandSet {
    build_commands(&self.toolchain)
  }

  fn post_build(&self, layout: &PathLayout) -> CommandSet {
    let out = layout.output_dir();
    CommandSet::from([
      format!("mkdir -p {}", out),
      format!("cp -R {} {}/", layout.source_entry(&self.toolchain.dependency_dir), out),
      format!(
        "cp -R {} {}/",
        layout.source_entry(&format!("{}/*", self.toolchain.compiled_dir)),
        out
      ),
    ])
  }
}

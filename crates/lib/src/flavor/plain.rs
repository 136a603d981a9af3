//! Plain-script pairings: dependencies are installed and the sources are
//! shipped as they are.

use super::{BuildStrategy, Flavor, Toolchain};
use crate::command::CommandSet;
use crate::environment::PathLayout;

/// Install production dependencies directly; there is nothing to compile.
fn build_commands(toolchain: &Toolchain) -> CommandSet {
  CommandSet::from([toolchain.install_production()])
}

#[derive(Debug, Clone, Default)]
pub struct PlainScriptContainer {
  toolchain: Toolchain,
}

impl PlainScriptContainer {
  pub fn new(toolchain: Toolchain) -> Self {
    Self { toolchain }
  }
}

impl BuildStrategy for PlainScriptContainer {
  fn flavor(&self) -> Flavor {
    Flavor::PlainScript
  }

  fn build(&self, _layout: &PathLayout) -> CommandSet {
    build_commands(&self.toolchain)
  }

  /// The container does not pre-create the output mount.
  fn post_build(&self, layout: &PathLayout) -> CommandSet {
    CommandSet::from([
      format!("mkdir -p {}/", layout.output_dir()),
      format!("cp -au {} {}/", layout.source_entry("*"), layout.output_dir()),
    ])
  }
}

#[derive(Debug, Clone, Default)]
pub struct PlainScriptLocal {
  toolchain: Toolchain,
}

impl PlainScriptLocal {
  pub fn new(toolchain: Toolchain) -> Self {
    Self { toolchain }
  }
}

impl BuildStrategy for PlainScriptLocal {
  fn flavor(&self) -> Flavor {
    Flavor::PlainScript
  }

  /// Dependencies left over from earlier host builds may include dev-only packages.
  fn pre_build(&self, _layout: &PathLayout) -> CommandSet {
    CommandSet::from([self.toolchain.remove_dependencies()])
  }

  fn build(&self, _layout: &PathLayout) -> CommandSet {
    build_commands(&self.toolchain)
  }

  fn post_build(&self, layout: &PathLayout) -> CommandSet {
    CommandSet::from([
      format!("mkdir -p {}", layout.output_dir()),
      format!("cp -R {} {}/", layout.source_entry("*"), layout.output_dir()),
    ])
  }
}

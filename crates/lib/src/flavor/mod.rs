//! Runtime flavor strategies.
//!
//! A strategy supplies the commands of each build phase for one
//! (flavor, environment) pairing. Strategies only produce commands; they
//! never run anything and hold no per-build state.
//!
//! # Pairings
//!
//! | flavor        | container                 | local                 |
//! |---------------|---------------------------|-----------------------|
//! | plain-script  | [`PlainScriptContainer`]  | [`PlainScriptLocal`]  |
//! | typed-script  | [`TypedScriptContainer`]  | [`TypedScriptLocal`]  |
//!
//! Typed-script pairings reuse plain-script phases by calling them
//! explicitly and appending their own commands.

mod plain;
mod typed;

pub use plain::{PlainScriptContainer, PlainScriptLocal};
pub use typed::{TypedScriptContainer, TypedScriptLocal};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::command::{CommandSet, Phase, shell_quote};
use crate::consts::{DEFAULT_BUILD_SCRIPT, DEFAULT_COMPILED_DIR, DEFAULT_DEPENDENCY_DIR, DEFAULT_PACKAGE_MANAGER};
use crate::environment::PathLayout;

/// Source-language variant of a module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Flavor {
  /// Sources are directly executable, no compile step.
  PlainScript,
  /// Sources must be compiled; only the compiled output ships.
  TypedScript,
}

impl Flavor {
  pub const ALL: [Flavor; 2] = [Flavor::PlainScript, Flavor::TypedScript];

  pub fn as_str(self) -> &'static str {
    match self {
      Flavor::PlainScript => "plain-script",
      Flavor::TypedScript => "typed-script",
    }
  }
}

impl fmt::Display for Flavor {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Flavor {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "plain-script" | "javascript" | "js" => Ok(Flavor::PlainScript),
      "typed-script" | "typescript" | "ts" => Ok(Flavor::TypedScript),
      other => Err(format!("unknown flavor: {} (expected plain-script or typed-script)", other)),
    }
  }
}

/// Package-manager program and artifact layout shared by all strategies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Toolchain {
  /// Package-manager executable, e.g. `npm`.
  pub package_manager: String,
  /// Directory the package manager installs dependencies into.
  pub dependency_dir: String,
  /// Directory the compile script writes its output to.
  pub compiled_dir: String,
  /// Name of the manifest script that compiles the sources.
  pub build_script: String,
}

impl Default for Toolchain {
  fn default() -> Self {
    Self {
      package_manager: DEFAULT_PACKAGE_MANAGER.to_string(),
      dependency_dir: DEFAULT_DEPENDENCY_DIR.to_string(),
      compiled_dir: DEFAULT_COMPILED_DIR.to_string(),
      build_script: DEFAULT_BUILD_SCRIPT.to_string(),
    }
  }
}

impl Toolchain {
  fn pm(&self) -> String {
    shell_quote(&self.package_manager)
  }

  /// Install all dependencies, including dev-only ones.
  pub fn install(&self) -> String {
    format!("{} install", self.pm())
  }

  /// Install production dependencies without a lockfile-exact install.
  pub fn install_production(&self) -> String {
    format!("{} install --omit=dev", self.pm())
  }

  /// Clean, lockfile-exact install of production dependencies.
  pub fn reinstall_production(&self) -> String {
    format!("{} ci --omit=dev", self.pm())
  }

  pub fn compile(&self) -> String {
    format!("{} run {}", self.pm(), shell_quote(&self.build_script))
  }

  /// Remove the dependency directory of the working directory.
  pub fn remove_dependencies(&self) -> String {
    format!("rm -fr ./{}", shell_quote(&self.dependency_dir))
  }

  /// Remove the compiled output of the working directory.
  pub fn remove_compiled(&self) -> String {
    format!("rm -fr {}", shell_quote(&self.compiled_dir))
  }
}

/// Commands of each phase for one (flavor, environment) pairing.
///
/// `pre_build` defaults to nothing. `build` and `post_build` are required:
/// a pairing without them cannot produce an artifact.
pub trait BuildStrategy: Send + Sync + fmt::Debug {
  fn flavor(&self) -> Flavor;

  fn pre_build(&self, _layout: &PathLayout) -> CommandSet {
    CommandSet::new()
  }

  fn build(&self, layout: &PathLayout) -> CommandSet;

  fn post_build(&self, layout: &PathLayout) -> CommandSet;

  /// Commands of `phase`.
  fn commands(&self, phase: Phase, layout: &PathLayout) -> CommandSet {
    match phase {
      Phase::PreBuild => self.pre_build(layout),
      Phase::Build => self.build(layout),
      Phase::PostBuild => self.post_build(layout),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn flavor_parses_language_aliases() {
    assert_eq!("typescript".parse::<Flavor>().unwrap(), Flavor::TypedScript);
    assert_eq!("js".parse::<Flavor>().unwrap(), Flavor::PlainScript);
    assert_eq!("plain-script".parse::<Flavor>().unwrap(), Flavor::PlainScript);
    assert!("python".parse::<Flavor>().is_err());
  }

  #[test]
  fn flavor_serde_matches_display() {
    for flavor in Flavor::ALL {
      let json = serde_json::to_string(&flavor).unwrap();
      assert_eq!(json, format!("\"{}\"", flavor));
    }
  }

  #[test]
  fn default_toolchain_commands() {
    let tc = Toolchain::default();
    assert_eq!(tc.install(), "npm install");
    assert_eq!(tc.install_production(), "npm install --omit=dev");
    assert_eq!(tc.reinstall_production(), "npm ci --omit=dev");
    assert_eq!(tc.compile(), "npm run build");
    assert_eq!(tc.remove_dependencies(), "rm -fr ./node_modules");
    assert_eq!(tc.remove_compiled(), "rm -fr dist");
  }

  #[test]
  fn toolchain_program_is_quoted() {
    let tc = Toolchain {
      package_manager: "/opt/my tools/npm".to_string(),
      ..Toolchain::default()
    };
    assert_eq!(tc.install(), "'/opt/my tools/npm' install");
  }

  #[test]
  fn toolchain_deserializes_partial() {
    let tc: Toolchain = serde_json::from_str(r#"{ "compiled_dir": "build" }"#).unwrap();
    assert_eq!(tc.compiled_dir, "build");
    assert_eq!(tc.package_manager, "npm");
    assert!(serde_json::from_str::<Toolchain>(r#"{ "linker": "ld" }"#).is_err());
  }
}

//! Bundle configuration.
//!
//! Configuration is resolved in layers, each overriding the previous one:
//!
//! 1. Built-in defaults
//! 2. A JSON config file (`--config`, or `assetpack.json` in the module)
//! 3. `ASSETPACK_*` environment variables
//! 4. Command-line flags (applied by the CLI)
//!
//! Nothing outside this module reads the process environment for settings.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::asset::ConstructContext;
use crate::consts::{CONFIG_FILE_NAME, DEFAULT_CONTAINER_ENGINE, DEFAULT_CONTAINER_IMAGE, DEFAULT_LOCAL_SHELL};
use crate::environment::{ContainerEnvironment, EnvironmentKind, LocalEnvironment};
use crate::error::ConfigError;
use crate::flavor::{Flavor, Toolchain};

pub const ENV_IMAGE: &str = "ASSETPACK_IMAGE";
pub const ENV_ENGINE: &str = "ASSETPACK_ENGINE";
pub const ENV_PACKAGE_MANAGER: &str = "ASSETPACK_PACKAGE_MANAGER";
pub const ENV_SHELL: &str = "ASSETPACK_SHELL";
pub const ENV_ENVIRONMENT: &str = "ASSETPACK_ENVIRONMENT";

/// Which environment a bundle should run in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EnvironmentPreference {
  /// Local if the toolchain is installed, otherwise a container.
  #[default]
  Auto,
  Container,
  Local,
}

impl From<EnvironmentKind> for EnvironmentPreference {
  fn from(kind: EnvironmentKind) -> Self {
    match kind {
      EnvironmentKind::Container => EnvironmentPreference::Container,
      EnvironmentKind::Local => EnvironmentPreference::Local,
    }
  }
}

impl fmt::Display for EnvironmentPreference {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      EnvironmentPreference::Auto => f.write_str("auto"),
      EnvironmentPreference::Container => f.write_str("container"),
      EnvironmentPreference::Local => f.write_str("local"),
    }
  }
}

impl FromStr for EnvironmentPreference {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "auto" => Ok(EnvironmentPreference::Auto),
      other => other.parse::<EnvironmentKind>().map(Into::into),
    }
  }
}

/// Settings of one bundle invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BundleConfig {
  pub flavor: Flavor,
  pub environment: EnvironmentPreference,
  /// Container image used for containerized builds.
  pub image: String,
  /// Container engine executable.
  pub engine: String,
  /// `uid[:gid]` the container runs as.
  pub user: Option<String>,
  /// Shell for local builds.
  pub shell: String,
  pub toolchain: Toolchain,
  /// Variables exported to every build command.
  pub vars: BTreeMap<String, String>,
}

impl Default for BundleConfig {
  fn default() -> Self {
    Self {
      flavor: Flavor::PlainScript,
      environment: EnvironmentPreference::Auto,
      image: DEFAULT_CONTAINER_IMAGE.to_string(),
      engine: DEFAULT_CONTAINER_ENGINE.to_string(),
      user: None,
      shell: DEFAULT_LOCAL_SHELL.to_string(),
      toolchain: Toolchain::default(),
      vars: BTreeMap::new(),
    }
  }
}

impl BundleConfig {
  /// Load a config file.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
      path: path.to_path_buf(),
      source,
    })?;
    serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
      path: path.to_path_buf(),
      source,
    })
  }

  /// Load `assetpack.json` from `module_dir` if present, defaults otherwise.
  pub fn discover(module_dir: &Path) -> Result<Self, ConfigError> {
    let path = module_dir.join(CONFIG_FILE_NAME);
    if path.is_file() {
      debug!(path = %path.display(), "loading module config");
      Self::load(&path)
    } else {
      Ok(Self::default())
    }
  }

  /// Apply `ASSETPACK_*` environment variables over the current values.
  pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
    if let Ok(image) = std::env::var(ENV_IMAGE) {
      self.image = image;
    }
    if let Ok(engine) = std::env::var(ENV_ENGINE) {
      self.engine = engine;
    }
    if let Ok(pm) = std::env::var(ENV_PACKAGE_MANAGER) {
      self.toolchain.package_manager = pm;
    }
    if let Ok(shell) = std::env::var(ENV_SHELL) {
      self.shell = shell;
    }
    if let Ok(env) = std::env::var(ENV_ENVIRONMENT) {
      self.environment = env.parse().map_err(|message| ConfigError::Invalid {
        key: ENV_ENVIRONMENT.to_string(),
        message,
      })?;
    }
    Ok(())
  }

  pub fn container_environment(&self) -> ContainerEnvironment {
    let env = ContainerEnvironment::new(&self.image).with_engine(&self.engine);
    match &self.user {
      Some(user) => env.with_user(user),
      None => env,
    }
  }

  pub fn local_environment(&self) -> LocalEnvironment {
    LocalEnvironment::new().with_shell(&self.shell)
  }

  pub fn construct_context(&self) -> ConstructContext {
    ConstructContext::from(self.vars.clone())
  }
}

/// Parse a `KEY=VALUE` pair.
pub fn parse_var(raw: &str) -> Result<(String, String), ConfigError> {
  match raw.split_once('=') {
    Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
    _ => Err(ConfigError::Invalid {
      key: raw.to_string(),
      message: "expected KEY=VALUE".to_string(),
    }),
  }
}

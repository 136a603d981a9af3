//! Error types of the packaging library.

use std::path::PathBuf;

use thiserror::Error;

use crate::environment::EnvironmentKind;
use crate::execute::ExecuteError;
use crate::flavor::Flavor;

/// Errors returned by the bundling surface.
#[derive(Debug, Error)]
pub enum BundleError {
  /// A command of the build failed. Carried unchanged from the runner.
  #[error(transparent)]
  Execute(#[from] ExecuteError),

  /// No strategy registered for the requested pairing.
  #[error("no build strategy registered for {flavor} in the {environment} environment")]
  ConfigurationMissing {
    flavor: Flavor,
    environment: EnvironmentKind,
  },

  /// Automatic environment selection found neither a local toolchain nor a container engine.
  #[error("no build environment available: {package_manager} and {engine} were not found on PATH")]
  EnvironmentUnavailable { package_manager: String, engine: String },

  #[error(transparent)]
  Config(#[from] ConfigError),
}

/// Errors loading or validating a bundle configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to read config {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to parse config {path}: {source}")]
  Parse {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },

  #[error("invalid config value for {key}: {message}")]
  Invalid { key: String, message: String },
}

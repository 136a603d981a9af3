//! Inputs of a single bundle run: the module to package, where the artifact
//! goes, and the opaque caller context.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Identifies the source tree being packaged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleRef {
  name: String,
  path: PathBuf,
}

impl ModuleRef {
  /// Reference a module by path. The name defaults to the last path component.
  pub fn new(path: impl Into<PathBuf>) -> Self {
    let path = absolute(path.into());
    let name = path
      .file_name()
      .map(|n| n.to_string_lossy().to_string())
      .unwrap_or_else(|| path.display().to_string());
    Self { name, path }
  }

  pub fn with_name(mut self, name: impl Into<String>) -> Self {
    self.name = name.into();
    self
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn path(&self) -> &Path {
    &self.path
  }
}

/// The directory that receives the finished artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OutputDir(PathBuf);

impl OutputDir {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self(absolute(path.into()))
  }

  pub fn path(&self) -> &Path {
    &self.0
  }
}

/// Caller-supplied configuration forwarded to the commands of a build.
///
/// The pipeline never interprets these values; environment adapters expose
/// them as environment variables of every command they run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConstructContext {
  vars: BTreeMap<String, String>,
}

impl ConstructContext {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
    self.vars.insert(key.into(), value.into());
    self
  }

  pub fn get(&self, key: &str) -> Option<&str> {
    self.vars.get(key).map(String::as_str)
  }

  pub fn vars(&self) -> &BTreeMap<String, String> {
    &self.vars
  }

  pub fn is_empty(&self) -> bool {
    self.vars.is_empty()
  }
}

impl From<BTreeMap<String, String>> for ConstructContext {
  fn from(vars: BTreeMap<String, String>) -> Self {
    Self { vars }
  }
}

/// Make `path` absolute without touching the filesystem.
fn absolute(path: PathBuf) -> PathBuf {
  if path.is_absolute() {
    return path;
  }
  std::path::absolute(&path).unwrap_or(path)
}

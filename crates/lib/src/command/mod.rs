//! Command sets and build phases.
//!
//! A [`CommandSet`] is the ordered list of shell commands a single phase
//! contributes to a build. It is computed right before its phase runs and
//! dropped once the phase has executed.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One step of the build lifecycle.
///
/// Phases always execute in declaration order, see [`Phase::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
  PreBuild,
  Build,
  PostBuild,
}

impl Phase {
  /// All phases in execution order.
  pub const ALL: [Phase; 3] = [Phase::PreBuild, Phase::Build, Phase::PostBuild];

  pub fn as_str(self) -> &'static str {
    match self {
      Phase::PreBuild => "pre-build",
      Phase::Build => "build",
      Phase::PostBuild => "post-build",
    }
  }
}

impl fmt::Display for Phase {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Phase {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "pre-build" => Ok(Phase::PreBuild),
      "build" => Ok(Phase::Build),
      "post-build" => Ok(Phase::PostBuild),
      other => Err(format!("unknown phase: {}", other)),
    }
  }
}

/// Ordered shell commands produced by one phase.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommandSet(Vec<String>);

impl CommandSet {
  pub fn new() -> Self {
    Self(Vec::new())
  }

  /// Append a command after the existing ones.
  pub fn push(&mut self, command: impl Into<String>) {
    self.0.push(command.into());
  }

  /// Append every command of `other`, preserving order.
  pub fn extend(&mut self, other: CommandSet) {
    self.0.extend(other.0);
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn iter(&self) -> std::slice::Iter<'_, String> {
    self.0.iter()
  }

  pub fn last(&self) -> Option<&str> {
    self.0.last().map(String::as_str)
  }

  pub fn as_slice(&self) -> &[String] {
    &self.0
  }

  /// Join the commands into one shell script that stops at the first failure.
  pub fn to_script(&self) -> String {
    self.0.join(" && ")
  }
}

impl<S: Into<String>> FromIterator<S> for CommandSet {
  fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
    Self(iter.into_iter().map(Into::into).collect())
  }
}

impl<S: Into<String>, const N: usize> From<[S; N]> for CommandSet {
  fn from(commands: [S; N]) -> Self {
    commands.into_iter().collect()
  }
}

impl IntoIterator for CommandSet {
  type Item = String;
  type IntoIter = std::vec::IntoIter<String>;

  fn into_iter(self) -> Self::IntoIter {
    self.0.into_iter()
  }
}

impl<'a> IntoIterator for &'a CommandSet {
  type Item = &'a String;
  type IntoIter = std::slice::Iter<'a, String>;

  fn into_iter(self) -> Self::IntoIter {
    self.0.iter()
  }
}

/// Quote a path or word for a POSIX shell.
///
/// Words made only of safe characters are returned as-is so that generated
/// commands stay readable; anything else is wrapped in single quotes.
/// A trailing glob is not protected, callers append it after quoting.
pub fn shell_quote(word: &str) -> String {
  let safe = !word.is_empty()
    && word
      .chars()
      .all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | '.' | '_' | '-' | ':' | '=' | '@' | '+' | ','));
  if safe {
    word.to_string()
  } else {
    format!("'{}'", word.replace('\'', r"'\''"))
  }
}

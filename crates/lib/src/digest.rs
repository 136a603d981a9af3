//! Deterministic digests of artifact directories.
//!
//! A digest covers directory structure, file contents and symlink targets,
//! but not metadata such as timestamps or permissions. Entries are sorted by
//! path, so two directories with the same contents always produce the same
//! digest regardless of creation order.

use std::fs;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use walkdir::WalkDir;

/// Full 64-character SHA-256 digest, lowercase hex.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OutputDigest(pub String);

impl std::fmt::Display for OutputDigest {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.0)
  }
}

#[derive(Debug, thiserror::Error)]
pub enum DigestError {
  #[error("failed to walk directory: {0}")]
  WalkDir(#[from] walkdir::Error),

  #[error("failed to read {path}: {source}")]
  Read {
    path: String,
    #[source]
    source: std::io::Error,
  },
}

/// Digest the contents of `path`, skipping entries whose name is in `exclude`.
pub fn digest_directory(path: &Path, exclude: &[&str]) -> Result<OutputDigest, DigestError> {
  let mut entries: Vec<(String, String)> = Vec::new();

  let walker = WalkDir::new(path).sort_by_file_name().into_iter().filter_entry(|e| {
    e.file_name()
      .to_str()
      .map(|name| !exclude.contains(&name))
      .unwrap_or(true)
  });

  for entry in walker {
    let entry = entry?;
    let entry_path = entry.path();

    let rel_path = entry_path
      .strip_prefix(path)
      .unwrap_or(entry_path)
      .to_string_lossy()
      .to_string();

    if rel_path.is_empty() {
      continue;
    }

    let file_type = entry.file_type();
    let line = if file_type.is_symlink() {
      let target = fs::read_link(entry_path).map_err(|source| DigestError::Read {
        path: entry_path.display().to_string(),
        source,
      })?;
      format!("L:{}:{}", rel_path, digest_bytes(target.to_string_lossy().as_bytes()))
    } else if file_type.is_file() {
      format!("F:{}:{}", rel_path, digest_file(entry_path)?)
    } else if file_type.is_dir() {
      format!("D:{}", rel_path)
    } else {
      // sockets, devices
      continue;
    };

    entries.push((rel_path, line));
  }

  entries.sort_by(|a, b| a.0.cmp(&b.0));

  let mut hasher = Sha256::new();
  for (_, line) in entries {
    hasher.update(line.as_bytes());
    hasher.update(b"\n");
  }

  Ok(OutputDigest(hex::encode(hasher.finalize())))
}

/// Digest a single file's contents.
pub fn digest_file(path: &Path) -> Result<OutputDigest, DigestError> {
  let read_err = |source| DigestError::Read {
    path: path.display().to_string(),
    source,
  };
  let mut file = fs::File::open(path).map_err(read_err)?;

  let mut hasher = Sha256::new();
  let mut buffer = [0u8; 8192];

  loop {
    let bytes_read = file.read(&mut buffer).map_err(read_err)?;
    if bytes_read == 0 {
      break;
    }
    hasher.update(&buffer[..bytes_read]);
  }

  Ok(OutputDigest(hex::encode(hasher.finalize())))
}

pub fn digest_bytes(data: &[u8]) -> OutputDigest {
  OutputDigest(hex::encode(Sha256::digest(data)))
}

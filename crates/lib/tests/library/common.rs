//! Shared helpers for library integration tests.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A temporary directory holding declaration files.
pub struct DeclarationDir {
  pub temp: TempDir,
}

impl DeclarationDir {
  pub fn new() -> Self {
    Self {
      temp: TempDir::new().unwrap(),
    }
  }

  /// Write a file relative to the temp directory and return its path.
  pub fn write(&self, relative_path: &str, content: &str) -> PathBuf {
    let path = self.temp.path().join(relative_path);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
    path
  }

  pub fn path(&self) -> &Path {
    self.temp.path()
  }
}

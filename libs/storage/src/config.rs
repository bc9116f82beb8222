use std::path::PathBuf;
use std::{env, io};

use serde::{Deserialize, Serialize};

/// Local filesystem storage configuration for recorder sessions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root directory; the `data/` tree is created beneath it.
    /// Relative roots are taken from the process working directory.
    #[serde(default = "default_fs_root")]
    pub root: PathBuf,
}

impl StorageConfig {
    /// Make `root` absolute against the current working directory, so every
    /// derived session path is absolute.
    pub fn resolve_root(&mut self) -> io::Result<()> {
        if self.root.is_relative() {
            self.root = env::current_dir()?.join(&self.root).components().collect();
        }
        Ok(())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: default_fs_root(),
        }
    }
}

fn default_fs_root() -> PathBuf {
    PathBuf::from(".")
}

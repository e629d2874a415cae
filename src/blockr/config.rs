//! # Configuration
//!
//! BlockR reads an optional `config.json` from its data directory. Missing
//! files and missing fields fall back to compiled defaults.
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `storage_file` | `storage.json` | File the key-value store lives in |
//! | `log_filter` | `blockr=warn` | `tracing` filter used when `RUST_LOG` is unset |
//!
//! The data directory itself is `$BLOCKR_HOME` when set, otherwise the
//! platform data directory (via the `directories` crate).

use crate::error::{BlockrError, Result};
use crate::store::fs::DEFAULT_STORAGE_FILE;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_LOG_FILTER: &str = "blockr=warn";
pub const HOME_ENV: &str = "BLOCKR_HOME";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BlockrConfig {
    #[serde(default = "default_storage_file")]
    pub storage_file: String,

    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_storage_file() -> String {
    DEFAULT_STORAGE_FILE.to_string()
}

fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

impl Default for BlockrConfig {
    fn default() -> Self {
        Self {
            storage_file: default_storage_file(),
            log_filter: default_log_filter(),
        }
    }
}

impl BlockrConfig {
    pub const KEYS: [&'static str; 2] = ["storage_file", "log_filter"];

    /// Reads `config.json` from `dir`. A missing file yields the defaults; an
    /// unparseable one is an error naming the file.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILENAME);
        match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).map_err(|e| {
                BlockrError::Config(format!("{} is not valid: {}", path.display(), e))
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(BlockrError::Io(e)),
        }
    }

    pub fn save(&self, dir: &Path) -> Result<()> {
        fs::create_dir_all(dir)?;
        fs::write(dir.join(CONFIG_FILENAME), serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "storage_file" => Some(self.storage_file.clone()),
            "log_filter" => Some(self.log_filter.clone()),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        match key {
            "storage_file" => {
                if value.is_empty() || value.contains(['/', '\\']) {
                    return Err(BlockrError::Config(format!(
                        "storage_file must be a plain file name, got '{}'",
                        value
                    )));
                }
                self.storage_file = value.to_string();
            }
            "log_filter" => {
                if value.is_empty() {
                    return Err(BlockrError::Config("log_filter cannot be empty".to_string()));
                }
                self.log_filter = value.to_string();
            }
            other => return Err(BlockrError::Config(format!("Unknown config key: {}", other))),
        }
        Ok(())
    }
}

/// Resolves the data directory: `$BLOCKR_HOME`, else the platform default.
pub fn data_dir() -> Result<PathBuf> {
    if let Some(home) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(home));
    }
    ProjectDirs::from("com", "blockr", "blockr")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| BlockrError::Config("Could not determine data directory".to_string()))
}

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where record documents and cached dumps live on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    pub root_path: PathBuf,
    pub records_rel_path: PathBuf,
    pub cache_rel_path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            root_path: PathBuf::from("./data"),
            records_rel_path: PathBuf::from("records"),
            cache_rel_path: PathBuf::from("cache"),
        }
    }
}

impl StoreConfig {
    /// Defaults overridden by `ROOT_PATH`, `RECORDS_REL_PATH` and `CACHE_REL_PATH`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(root) = lookup("ROOT_PATH") {
            config.root_path = PathBuf::from(root);
        }
        if let Some(records) = lookup("RECORDS_REL_PATH") {
            config.records_rel_path = PathBuf::from(records);
        }
        if let Some(cache) = lookup("CACHE_REL_PATH") {
            config.cache_rel_path = PathBuf::from(cache);
        }
        config
    }

    pub fn records_dir(&self) -> PathBuf {
        self.root_path.join(&self.records_rel_path)
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.root_path.join(&self.cache_rel_path)
    }
}

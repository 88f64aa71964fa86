/// Indexer configuration
use crate::error::{IndexerError, Result};
use serde::{Deserialize, Serialize};
use soul_bucket_scan::ScanConfig;
use std::path::{Path, PathBuf};

/// Environment variable prefix; nested keys use `__`, e.g.
/// `SOUL_INDEXER_SCAN__WORKERS=8`.
pub const ENV_PREFIX: &str = "SOUL_INDEXER";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IndexerConfig {
    #[serde(default = "default_store")]
    pub store: StoreSettings,

    #[serde(default)]
    pub scan: ScanConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreSettings {
    /// Directory whose sub-directories are buckets
    #[serde(default = "default_root")]
    pub root: PathBuf,

    #[serde(default = "default_bucket")]
    pub bucket: String,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            store: default_store(),
            scan: ScanConfig::default(),
        }
    }
}

impl IndexerConfig {
    /// Load configuration from file and environment.
    ///
    /// An explicit `path` must exist; otherwise `config.toml` in the working
    /// directory is read when present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path).required(true));
            }
            None => {
                let default_path = PathBuf::from("config.toml");
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        settings = settings.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| IndexerError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| IndexerError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.store.bucket.is_empty() {
            return Err(IndexerError::Config("store.bucket is required".to_string()));
        }

        self.scan
            .validate()
            .map_err(|e| IndexerError::Config(e.to_string()))
    }
}

// Default values
fn default_store() -> StoreSettings {
    StoreSettings {
        root: default_root(),
        bucket: default_bucket(),
    }
}

fn default_root() -> PathBuf {
    PathBuf::from("./data/buckets")
}

fn default_bucket() -> String {
    "music".to_string()
}

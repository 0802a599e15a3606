use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use totalline_label::DEFAULT_MIN_POSITIVES;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Settings for building a training set, read from `totalline.toml`.
///
/// Every key is optional; command-line flags override whatever the file sets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrainerConfig {
    /// Exported `receipt_labels.jsonl`.
    pub dataset: PathBuf,
    /// Where labeled samples are written.
    pub output: PathBuf,
    pub min_positives: usize,
    /// Drop exact duplicate records before labeling.
    pub dedup: bool,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            dataset: PathBuf::from("receipt_labels.jsonl"),
            output: PathBuf::from("total_line_samples.jsonl"),
            min_positives: DEFAULT_MIN_POSITIVES,
            dedup: false,
        }
    }
}

impl TrainerConfig {
    pub fn from_toml(toml_content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_content)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }
}

use std::{path::PathBuf, time::Duration};

use thiserror::Error;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub credentials_path: PathBuf,
    pub search: SearchConfig,
    pub collection: CollectionConfig,
    pub download: DownloadConfig,
    pub directories: DirectoryConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub api_url: String,
    pub subreddit: String,
    pub batch_size: usize,
    pub timeout: Duration,
    pub hydrate_with_reddit: bool,
}

#[derive(Debug, Clone)]
pub struct CollectionConfig {
    pub fetch_count: usize,
    pub mode: ClassificationMode,
    pub min_upvote_ratio: f64,
    /// Unix seconds; `None` starts from the current time.
    pub start_before: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct DownloadConfig {
    pub split_targets: SplitTargets,
    pub max_attempts: u32,
    pub backoff: Duration,
}

#[derive(Debug, Clone)]
pub struct DirectoryConfig {
    pub logs_dir: String,
    pub data_dir: String,
    pub toc_filename: String,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassificationMode {
    Binary,
    Multiclass,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitTargets {
    pub train: usize,
    pub test: usize,
    pub val: usize,
}

impl SplitTargets {
    pub fn total(&self) -> usize {
        self.train + self.test + self.val
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    Missing(&'static str),
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

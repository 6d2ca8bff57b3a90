use std::{env, path::PathBuf, str::FromStr, time::Duration};

use super::env::{
    AppConfig, ClassificationMode, CollectionConfig, ConfigError, DirectoryConfig,
    DownloadConfig, LoggingConfig, SearchConfig, SplitTargets,
};

const DEFAULT_SEARCH_API_URL: &str = "https://api.pushshift.io/reddit/search/submission";

pub fn load_config() -> Result<AppConfig, ConfigError> {
    AppConfig::from_env()
}

impl AppConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let fetch_count = env::var("FETCH_COUNT").map_err(|_| ConfigError::Missing("FETCH_COUNT"))?;
        let fetch_count = fetch_count
            .trim()
            .parse::<usize>()
            .map_err(|_| ConfigError::Invalid {
                key: "FETCH_COUNT",
                value: fetch_count.clone(),
            })?;

        let credentials_path = PathBuf::from(
            env::var("CREDENTIALS_PATH").unwrap_or_else(|_| "src/api_credentials.txt".to_string()),
        );

        let search = SearchConfig {
            api_url: env::var("SEARCH_API_URL").unwrap_or_else(|_| DEFAULT_SEARCH_API_URL.to_string()),
            subreddit: env::var("SUBREDDIT").unwrap_or_else(|_| "Art".to_string()),
            batch_size: parse_or("BATCH_SIZE", 1000),
            timeout: Duration::from_millis(parse_or("HTTP_TIMEOUT_MS", 30_000)),
            hydrate_with_reddit: env::var("REDDIT_HYDRATE")
                .map(|v| matches!(v.trim(), "1" | "true" | "yes"))
                .unwrap_or(false),
        };

        let mode = match env::var("CLASSIFICATION_MODE") {
            Ok(value) => value.parse::<ClassificationMode>()?,
            Err(_) => ClassificationMode::Binary,
        };

        let collection = CollectionConfig {
            fetch_count,
            mode,
            min_upvote_ratio: parse_or("MIN_UPVOTE_RATIO", 0.4),
            start_before: env::var("START_BEFORE").ok().and_then(|v| v.trim().parse().ok()),
        };

        let split_targets = match env::var("SPLIT_TARGETS") {
            Ok(value) => value.parse::<SplitTargets>()?,
            Err(_) => SplitTargets {
                train: 700,
                test: 150,
                val: 150,
            },
        };

        let download = DownloadConfig {
            split_targets,
            max_attempts: parse_or::<u32>("DOWNLOAD_MAX_ATTEMPTS", 3).max(1),
            backoff: Duration::from_millis(parse_or("DOWNLOAD_BACKOFF_MS", 500)),
        };

        let directories = DirectoryConfig {
            logs_dir: env::var("LOGS_DIR").unwrap_or_else(|_| "logs".to_string()),
            data_dir: env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string()),
            toc_filename: env::var("TOC_FILENAME").unwrap_or_else(|_| "toc.json".to_string()),
        };

        let logging = LoggingConfig {
            level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        };

        Ok(Self {
            credentials_path,
            search,
            collection,
            download,
            directories,
            logging,
        })
    }
}

impl FromStr for ClassificationMode {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "binary" => Ok(Self::Binary),
            "multiclass" | "multi" => Ok(Self::Multiclass),
            _ => Err(ConfigError::Invalid {
                key: "CLASSIFICATION_MODE",
                value: value.to_string(),
            }),
        }
    }
}

impl FromStr for SplitTargets {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::Invalid {
            key: "SPLIT_TARGETS",
            value: value.to_string(),
        };
        let parts = value
            .split(',')
            .map(|part| part.trim().parse::<usize>().map_err(|_| invalid()))
            .collect::<Result<Vec<_>, _>>()?;
        match parts.as_slice() {
            [train, test, val] => Ok(Self {
                train: *train,
                test: *test,
                val: *val,
            }),
            _ => Err(invalid()),
        }
    }
}

fn parse_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|value| value.trim().parse::<T>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_targets_parse_in_train_test_val_order() {
        let targets: SplitTargets = "700, 150,100".parse().unwrap();
        assert_eq!(
            targets,
            SplitTargets {
                train: 700,
                test: 150,
                val: 100
            }
        );
        assert_eq!(targets.total(), 950);
    }

    #[test]
    fn split_targets_reject_wrong_arity() {
        assert!("700,150".parse::<SplitTargets>().is_err());
        assert!("a,b,c".parse::<SplitTargets>().is_err());
    }

    #[test]
    fn classification_mode_is_case_insensitive() {
        assert_eq!(
            "Binary".parse::<ClassificationMode>().unwrap(),
            ClassificationMode::Binary
        );
        assert_eq!(
            "MULTICLASS".parse::<ClassificationMode>().unwrap(),
            ClassificationMode::Multiclass
        );
        assert!("tri".parse::<ClassificationMode>().is_err());
    }
}

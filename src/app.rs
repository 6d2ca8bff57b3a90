use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use chrono::{TimeZone, Utc};
use reqwest::Client;

use crate::{
    collect::BalancedCollector,
    config::{AppConfig, ClassificationMode},
    dataset::{
        download_and_store_binary, establish_binary_directory, load_toc, merge_toc, save_toc,
        total_balance, DatasetIndex, HttpImageFetcher, ImageDownloader,
    },
    domain::Split,
    infrastructure::{directories::ResolvedPaths, shutdown::Shutdown},
    source::{ApiCredentials, PushshiftClient, RedditClient},
};

pub struct HarvestApp {
    config: Arc<AppConfig>,
    paths: ResolvedPaths,
    dataset_root: PathBuf,
    source: PushshiftClient,
    downloader: ImageDownloader<HttpImageFetcher>,
    shutdown: Shutdown,
}

impl HarvestApp {
    pub fn initialize(config: AppConfig, paths: ResolvedPaths, shutdown: Shutdown) -> Result<Self> {
        let config = Arc::new(config);
        let credentials = ApiCredentials::load(&config.credentials_path).with_context(|| {
            format!(
                "API credentials are required at {}",
                config.credentials_path.display()
            )
        })?;

        let http_client = Client::builder()
            .user_agent(credentials.user_agent.clone())
            .build()?;

        let hydrator = config
            .search
            .hydrate_with_reddit
            .then(|| RedditClient::new(http_client.clone(), credentials.clone()));
        let source = PushshiftClient::new(http_client.clone(), config.search.clone(), hydrator);

        let downloader = ImageDownloader::new(
            HttpImageFetcher::new(http_client, config.search.timeout),
            config.download.max_attempts,
            config.download.backoff,
        );

        let dataset_root = establish_binary_directory(&paths.data_dir)?;

        Ok(Self {
            config,
            paths,
            dataset_root,
            source,
            downloader,
            shutdown,
        })
    }

    pub async fn run(self) -> Result<()> {
        let HarvestApp {
            config,
            paths,
            dataset_root,
            source,
            downloader,
            shutdown,
        } = self;

        tracing::info!(
            subreddit = %config.search.subreddit,
            fetch = config.collection.fetch_count,
            dataset = %dataset_root.display(),
            "medium harvest starting"
        );

        let on_disk = total_balance(&dataset_root)?;
        let current = match config.collection.mode {
            ClassificationMode::Binary if on_disk.values().sum::<usize>() > 0 => Some(&on_disk),
            _ => None,
        };
        if let Some(current) = current {
            tracing::info!(target: "collect", ?current, "resuming from images already on disk");
        }

        let before = config
            .collection
            .start_before
            .unwrap_or_else(|| Utc::now().timestamp());
        let mut toc = load_toc(&paths.toc_path)?;
        let collector = BalancedCollector::new(config.collection.clone(), config.search.batch_size)
            .skip_ids(toc.iter().map(|post| post.id.clone()));
        let mut listener = shutdown.subscribe();
        let collected = collector
            .collect(&source, before, current, &mut listener)
            .await?;

        let added = merge_toc(&mut toc, collected.posts);
        save_toc(&paths.toc_path, &toc)?;
        tracing::info!(
            target: "collect",
            added,
            total = toc.len(),
            resume_before = collected.cursor,
            resume_date = %format_timestamp(collected.cursor),
            "table of contents updated"
        );

        if listener.is_triggered() {
            tracing::info!("shutdown requested; skipping downloads");
            return Ok(());
        }

        let report = download_and_store_binary(
            &toc,
            &dataset_root,
            config.download.split_targets,
            &downloader,
            &listener,
        )
        .await?;
        tracing::info!(
            target: "download",
            stored = report.stored,
            already_present = report.already_present,
            unavailable = report.unavailable,
            balances = ?report.balances,
            "downloads finished"
        );

        for split in Split::ALL {
            let index = DatasetIndex::scan(&dataset_root.join(split.dir_name()))?;
            tracing::info!(
                target: "dataset",
                %split,
                samples = index.len(),
                classes = ?index.class_names,
                per_class = ?index.class_counts(),
                "split ready for training"
            );
        }

        tracing::info!("medium harvest finished");
        Ok(())
    }
}

fn format_timestamp(unix: i64) -> String {
    Utc.timestamp_opt(unix, 0)
        .single()
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| unix.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_unix_timestamps() {
        assert_eq!(format_timestamp(0), "1970-01-01 00:00:00 UTC");
        assert_eq!(format_timestamp(1_612_345_678), "2021-02-03 09:47:58 UTC");
    }
}

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{anyhow, Context, Result};
use futures::{future::BoxFuture, FutureExt};
use reqwest::Client;
use url::Url;

use crate::domain::PostRecord;

use super::layout::PARTIAL_EXTENSION;

const MAX_BACKOFF: Duration = Duration::from_secs(60);

pub trait ImageFetcher: Send + Sync {
    fn fetch<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<Vec<u8>>>;
}

pub struct HttpImageFetcher {
    http: Client,
    timeout: Duration,
}

impl HttpImageFetcher {
    pub fn new(http: Client, timeout: Duration) -> Self {
        Self { http, timeout }
    }
}

impl ImageFetcher for HttpImageFetcher {
    fn fetch<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<Vec<u8>>> {
        async move {
            let response = self
                .http
                .get(url)
                .timeout(self.timeout)
                .send()
                .await
                .with_context(|| format!("failed to fetch {url}"))?
                .error_for_status()?;
            let bytes = response.bytes().await?;
            Ok(bytes.to_vec())
        }
        .boxed()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    Stored(PathBuf),
    AlreadyExists(PathBuf),
    Unavailable { attempts: u32, error: String },
}

impl DownloadOutcome {
    pub fn added(&self) -> usize {
        match self {
            DownloadOutcome::Stored(_) => 1,
            DownloadOutcome::AlreadyExists(_) | DownloadOutcome::Unavailable { .. } => 0,
        }
    }
}

pub struct ImageDownloader<F> {
    fetcher: F,
    max_attempts: u32,
    backoff: Duration,
}

impl<F: ImageFetcher> ImageDownloader<F> {
    pub fn new(fetcher: F, max_attempts: u32, backoff: Duration) -> Self {
        Self {
            fetcher,
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }

    #[cfg(test)]
    pub(crate) fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Stores the image of `post` in `dir` as `<id>.<ext>`, unless a file of
    /// that name is already there. Only filesystem errors are returned as
    /// `Err`; unusable URLs and fetch failures become `Unavailable`.
    pub async fn download_image(&self, post: &PostRecord, dir: &Path) -> Result<DownloadOutcome> {
        let file_name = match image_file_name(post) {
            Ok(name) => name,
            Err(err) => {
                return Ok(DownloadOutcome::Unavailable {
                    attempts: 0,
                    error: format!("{err:#}"),
                })
            }
        };
        let file_path = dir.join(file_name);
        if tokio::fs::try_exists(&file_path).await? {
            tracing::info!(target: "download", file = %file_path.display(), "already exists");
            return Ok(DownloadOutcome::AlreadyExists(file_path));
        }

        let mut last_error = None;
        for attempt in 1..=self.max_attempts {
            match self.fetcher.fetch(&post.url).await {
                Ok(bytes) => {
                    write_atomically(&file_path, &bytes).await?;
                    return Ok(DownloadOutcome::Stored(file_path));
                }
                Err(err) => {
                    tracing::warn!(
                        target: "download",
                        id = %post.id,
                        attempt,
                        max_attempts = self.max_attempts,
                        error = %err,
                        "error downloading image"
                    );
                    last_error = Some(err);
                    if attempt < self.max_attempts {
                        tokio::time::sleep(self.backoff_delay(attempt)).await;
                    }
                }
            }
        }

        Ok(DownloadOutcome::Unavailable {
            attempts: self.max_attempts,
            error: last_error
                .map(|err| format!("{err:#}"))
                .unwrap_or_default(),
        })
    }

    fn backoff_delay(&self, attempt: u32) -> Duration {
        2u32.checked_pow(attempt.saturating_sub(1))
            .and_then(|factor| self.backoff.checked_mul(factor))
            .map_or(MAX_BACKOFF, |delay| delay.min(MAX_BACKOFF))
    }
}

pub fn image_file_name(post: &PostRecord) -> Result<String> {
    let url = Url::parse(&post.url).with_context(|| format!("invalid image url {}", post.url))?;
    let extension = url
        .path()
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty() && !ext.contains('/'))
        .ok_or_else(|| anyhow!("image url {} has no file extension", post.url))?;
    Ok(format!("{}.{}", post.id, extension))
}

// A partial file would otherwise be counted as an existing image on the
// next run.
async fn write_atomically(path: &Path, bytes: &[u8]) -> Result<()> {
    let partial = path.with_extension(PARTIAL_EXTENSION);
    tokio::fs::write(&partial, bytes)
        .await
        .with_context(|| format!("failed to write {}", partial.display()))?;
    tokio::fs::rename(&partial, path)
        .await
        .with_context(|| format!("failed to move image into {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use std::{
        collections::HashMap,
        sync::atomic::{AtomicUsize, Ordering},
    };

    use parking_lot::Mutex;

    use super::*;
    use crate::domain::Medium;

    #[derive(Default)]
    pub(crate) struct FakeFetcher {
        pub failures_before_success: Mutex<HashMap<String, usize>>,
        pub calls: AtomicUsize,
    }

    impl FakeFetcher {
        pub fn failing(url: &str, times: usize) -> Self {
            let fetcher = Self::default();
            fetcher
                .failures_before_success
                .lock()
                .insert(url.to_string(), times);
            fetcher
        }
    }

    impl ImageFetcher for FakeFetcher {
        fn fetch<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<Vec<u8>>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut failures = self.failures_before_success.lock();
            let result = match failures.get_mut(url) {
                Some(remaining) if *remaining > 0 => {
                    *remaining -= 1;
                    Err(anyhow!("connection reset"))
                }
                _ => Ok(url.as_bytes().to_vec()),
            };
            async move { result }.boxed()
        }
    }

    pub(crate) fn record(id: &str, medium: Medium, ext: &str) -> PostRecord {
        PostRecord {
            title: format!("{id}, me, {medium}, 2021"),
            medium,
            url: format!("https://i.redd.it/{id:0>13}.{ext}"),
            id: id.to_string(),
            unix_time: 1_600_000_000,
        }
    }

    #[test]
    fn file_name_uses_id_and_url_extension() {
        let post = record("abc", Medium::Ink, "png");
        assert_eq!(image_file_name(&post).unwrap(), "abc.png");

        let mut no_ext = record("abc", Medium::Ink, "png");
        no_ext.url = "https://i.redd.it/abc".into();
        assert!(image_file_name(&no_ext).is_err());
    }

    #[tokio::test]
    async fn stores_then_skips_duplicates() {
        let tmp = tempfile::tempdir().unwrap();
        let downloader = ImageDownloader::new(FakeFetcher::default(), 3, Duration::ZERO);
        let post = record("p1", Medium::Digital, "jpg");

        let first = downloader.download_image(&post, tmp.path()).await.unwrap();
        let path = tmp.path().join("p1.jpg");
        assert_eq!(first, DownloadOutcome::Stored(path.clone()));
        assert_eq!(first.added(), 1);
        assert_eq!(std::fs::read(&path).unwrap(), post.url.as_bytes());

        let second = downloader.download_image(&post, tmp.path()).await.unwrap();
        assert_eq!(second, DownloadOutcome::AlreadyExists(path));
        assert_eq!(second.added(), 0);
        assert_eq!(downloader.fetcher.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_transient_failures() {
        let tmp = tempfile::tempdir().unwrap();
        let post = record("p2", Medium::Paint, "jpg");
        let downloader =
            ImageDownloader::new(FakeFetcher::failing(&post.url, 2), 3, Duration::ZERO);

        let outcome = downloader.download_image(&post, tmp.path()).await.unwrap();
        assert_eq!(outcome.added(), 1);
        assert_eq!(downloader.fetcher.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts() {
        let tmp = tempfile::tempdir().unwrap();
        let post = record("p3", Medium::Paint, "jpg");
        let downloader =
            ImageDownloader::new(FakeFetcher::failing(&post.url, 10), 2, Duration::ZERO);

        let outcome = downloader.download_image(&post, tmp.path()).await.unwrap();
        assert!(matches!(outcome, DownloadOutcome::Unavailable { attempts: 2, .. }));
        assert_eq!(downloader.fetcher.calls.load(Ordering::SeqCst), 2);
        assert!(!tmp.path().join("p3.jpg").exists());
        assert!(!tmp.path().join("p3.part").exists());
    }

    #[test]
    fn backoff_doubles_and_saturates() {
        let downloader =
            ImageDownloader::new(FakeFetcher::default(), 5, Duration::from_millis(500));
        assert_eq!(downloader.backoff_delay(1), Duration::from_millis(500));
        assert_eq!(downloader.backoff_delay(3), Duration::from_secs(2));
        assert_eq!(downloader.backoff_delay(40), MAX_BACKOFF);

        let huge = ImageDownloader::new(FakeFetcher::default(), u32::MAX, Duration::MAX);
        assert_eq!(huge.backoff_delay(2), MAX_BACKOFF);
        assert_eq!(huge.backoff_delay(u32::MAX), MAX_BACKOFF);
    }

    #[tokio::test]
    async fn url_without_extension_is_unavailable() {
        let tmp = tempfile::tempdir().unwrap();
        let mut post = record("p4", Medium::Ink, "jpg");
        post.url.push('/');
        let downloader = ImageDownloader::new(FakeFetcher::default(), 3, Duration::ZERO);

        let outcome = downloader.download_image(&post, tmp.path()).await.unwrap();
        assert!(matches!(outcome, DownloadOutcome::Unavailable { attempts: 0, .. }));
        assert_eq!(downloader.fetcher.calls.load(Ordering::SeqCst), 0);
    }
}

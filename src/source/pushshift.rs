use anyhow::{Context, Result};
use futures::{future::BoxFuture, FutureExt};
use reqwest::Client;
use serde::Deserialize;

use crate::{config::SearchConfig, domain::Submission};

use super::{RedditClient, SubmissionSource};

pub struct PushshiftClient {
    http: Client,
    config: SearchConfig,
    hydrator: Option<RedditClient>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    data: Vec<Submission>,
}

impl PushshiftClient {
    pub fn new(http: Client, config: SearchConfig, hydrator: Option<RedditClient>) -> Self {
        Self {
            http,
            config,
            hydrator,
        }
    }

    async fn search(&self, before: i64, limit: usize) -> Result<Vec<Submission>> {
        let size = limit.to_string();
        let before_param = before.to_string();
        let response = self
            .http
            .get(&self.config.api_url)
            .query(&[
                ("subreddit", self.config.subreddit.as_str()),
                ("before", before_param.as_str()),
                ("size", size.as_str()),
                ("sort", "desc"),
                ("sort_type", "created_utc"),
            ])
            .timeout(self.config.timeout)
            .send()
            .await
            .with_context(|| format!("search request before {before} failed"))?
            .error_for_status()?;

        let body: SearchResponse = response
            .json()
            .await
            .context("search response was not valid JSON")?;
        let mut batch = body.data;

        if let Some(hydrator) = &self.hydrator {
            if let Err(err) = hydrator.hydrate(&mut batch).await {
                tracing::warn!(
                    target: "source",
                    error = %err,
                    "failed to refresh batch from reddit; using archived values"
                );
            }
        }
        Ok(batch)
    }
}

impl SubmissionSource for PushshiftClient {
    fn search_before(&self, before: i64, limit: usize) -> BoxFuture<'_, Result<Vec<Submission>>> {
        self.search(before, limit).boxed()
    }
}

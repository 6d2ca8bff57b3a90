use std::{
    collections::HashMap,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::domain::Submission;

use super::ApiCredentials;

const TOKEN_URL: &str = "https://www.reddit.com/api/v1/access_token";
const INFO_URL: &str = "https://oauth.reddit.com/api/info";
const INFO_CHUNK: usize = 100;
const TOKEN_REFRESH_MARGIN: Duration = Duration::from_secs(60);

/// Application-only Reddit client used to refresh archived submissions with
/// their current vote ratio and body.
pub struct RedditClient {
    http: Client,
    credentials: ApiCredentials,
    token: Mutex<Option<CachedToken>>,
}

struct CachedToken {
    value: String,
    expires_at: Instant,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    children: Vec<Thing>,
}

#[derive(Debug, Deserialize)]
struct Thing {
    data: LiveSubmission,
}

#[derive(Debug, Deserialize)]
struct LiveSubmission {
    id: String,
    #[serde(default)]
    selftext: Option<String>,
    #[serde(default)]
    upvote_ratio: Option<f64>,
    #[serde(default)]
    score: Option<i64>,
}

impl RedditClient {
    pub fn new(http: Client, credentials: ApiCredentials) -> Self {
        Self {
            http,
            credentials,
            token: Mutex::new(None),
        }
    }

    async fn access_token(&self) -> Result<String> {
        let mut guard = self.token.lock().await;
        if let Some(token) = guard.as_ref() {
            if token.expires_at > Instant::now() {
                return Ok(token.value.clone());
            }
        }

        let response: TokenResponse = self
            .http
            .post(TOKEN_URL)
            .basic_auth(&self.credentials.client_id, Some(&self.credentials.client_secret))
            .header(reqwest::header::USER_AGENT, &self.credentials.user_agent)
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .context("reddit token request failed")?
            .error_for_status()?
            .json()
            .await
            .context("reddit token response was not valid JSON")?;

        let lifetime = Duration::from_secs(response.expires_in).saturating_sub(TOKEN_REFRESH_MARGIN);
        tracing::debug!(target: "source", ?lifetime, "reddit access token refreshed");
        *guard = Some(CachedToken {
            value: response.access_token.clone(),
            expires_at: Instant::now() + lifetime,
        });
        Ok(response.access_token)
    }

    pub async fn hydrate(&self, batch: &mut [Submission]) -> Result<()> {
        let mut live = HashMap::with_capacity(batch.len());
        for chunk in batch.chunks(INFO_CHUNK) {
            let ids = chunk
                .iter()
                .map(|post| format!("t3_{}", post.id))
                .collect::<Vec<_>>()
                .join(",");
            let token = self.access_token().await?;
            let listing: Listing = self
                .http
                .get(INFO_URL)
                .bearer_auth(token)
                .header(reqwest::header::USER_AGENT, &self.credentials.user_agent)
                .query(&[("id", ids.as_str())])
                .send()
                .await
                .context("reddit info request failed")?
                .error_for_status()?
                .json()
                .await
                .context("reddit info response was not valid JSON")?;
            live.extend(
                listing
                    .data
                    .children
                    .into_iter()
                    .map(|thing| (thing.data.id.clone(), thing.data)),
            );
        }

        for post in batch.iter_mut() {
            if let Some(fresh) = live.remove(&post.id) {
                apply_live(post, fresh);
            }
        }
        Ok(())
    }
}

fn apply_live(post: &mut Submission, fresh: LiveSubmission) {
    if let Some(selftext) = fresh.selftext {
        post.selftext = selftext;
    }
    if let Some(ratio) = fresh.upvote_ratio {
        post.upvote_ratio = ratio;
    }
    if fresh.score.is_some() {
        post.score = fresh.score;
    }
}

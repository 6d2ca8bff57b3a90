use serde::{Deserialize, Serialize};

use super::types::Medium;

#[derive(Debug, Clone, Deserialize)]
pub struct Submission {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(deserialize_with = "timestamp_seconds")]
    pub created_utc: i64,
    #[serde(default)]
    pub selftext: String,
    #[serde(default = "default_upvote_ratio")]
    pub upvote_ratio: f64,
    #[serde(default)]
    pub score: Option<i64>,
}

fn default_upvote_ratio() -> f64 {
    1.0
}

// The search API reports `created_utc` as an integer or a float depending on
// the index generation.
fn timestamp_seconds<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    Ok(value as i64)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostRecord {
    pub title: String,
    pub medium: Medium,
    pub url: String,
    pub id: String,
    pub unix_time: i64,
}

impl PostRecord {
    pub fn new(submission: &Submission, medium: Medium) -> Self {
        Self {
            title: submission.title.clone(),
            medium,
            url: submission.url.clone(),
            id: submission.id.clone(),
            unix_time: submission.created_utc,
        }
    }
}

pub mod credentials;
pub mod pushshift;
pub mod reddit;

use anyhow::Result;
use futures::future::BoxFuture;

use crate::domain::Submission;

pub use credentials::ApiCredentials;
pub use pushshift::PushshiftClient;
pub use reddit::RedditClient;

/// A paginated submissions search. Results are newest first and strictly
/// older than `before` (unix seconds).
pub trait SubmissionSource: Send + Sync {
    fn search_before(&self, before: i64, limit: usize) -> BoxFuture<'_, Result<Vec<Submission>>>;
}

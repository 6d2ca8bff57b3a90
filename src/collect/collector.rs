use std::collections::{BTreeMap, HashSet};

use anyhow::Result;

use crate::{
    classify::{extract_medium_from_title, validate_submission},
    config::{ClassificationMode, CollectionConfig},
    domain::{BinaryClass, Medium, PostRecord, Submission},
    infrastructure::shutdown::ShutdownListener,
    source::SubmissionSource,
};

use super::ClassBalance;

/// Polls a submission source backwards in time, keeping only posts whose
/// class still has room so that every class ends at the same count.
pub struct BalancedCollector {
    config: CollectionConfig,
    batch_size: usize,
    known_ids: HashSet<String>,
}

#[derive(Debug)]
pub struct Collected {
    pub posts: Vec<PostRecord>,
    pub balance: ClassBalance,
    /// Timestamp of the oldest post seen; pass it as `start_before` to resume.
    pub cursor: i64,
}

struct Quotas {
    mode: ClassificationMode,
    classes: ClassBalance,
    subclasses: Option<ClassBalance>,
}

impl Quotas {
    fn new(
        mode: ClassificationMode,
        fetch_count: usize,
        current: Option<&BTreeMap<String, usize>>,
    ) -> Self {
        let class_names: Vec<&str> = match mode {
            ClassificationMode::Binary => BinaryClass::ALL.iter().map(|c| c.dir_name()).collect(),
            ClassificationMode::Multiclass => {
                Medium::CATEGORIES.iter().map(|m| m.as_str()).collect()
            }
        };

        let existing: usize = current.map(|counts| counts.values().sum()).unwrap_or(0);
        let per_class = (fetch_count + existing) / class_names.len();

        let mut classes = ClassBalance::new(class_names, per_class);
        if let Some(current) = current {
            for (class, count) in current {
                if !classes.seed(class, *count) {
                    tracing::warn!(
                        target: "collect",
                        class = %class,
                        count,
                        "ignoring existing count for an untracked class"
                    );
                }
            }
        }

        let subclasses = match mode {
            ClassificationMode::Binary => Some(ClassBalance::new(
                Medium::NON_DIGITAL_SUBCLASSES.iter().map(|m| m.as_str()),
                per_class.div_ceil(Medium::NON_DIGITAL_SUBCLASSES.len()),
            )),
            ClassificationMode::Multiclass => None,
        };

        Self {
            mode,
            classes,
            subclasses,
        }
    }

    fn admit(&mut self, medium: Medium) -> bool {
        match self.mode {
            ClassificationMode::Multiclass => self.classes.try_increment(medium.as_str()),
            ClassificationMode::Binary => {
                if medium == Medium::Digital {
                    return self.classes.try_increment(BinaryClass::Digital.dir_name());
                }
                if !Medium::NON_DIGITAL_SUBCLASSES.contains(&medium) {
                    return false;
                }
                let non_digital = BinaryClass::NonDigital.dir_name();
                let Some(subclasses) = self.subclasses.as_mut() else {
                    return false;
                };
                if !self.classes.has_room(non_digital) || !subclasses.has_room(medium.as_str()) {
                    return false;
                }
                subclasses.try_increment(medium.as_str()) && self.classes.try_increment(non_digital)
            }
        }
    }
}

impl BalancedCollector {
    pub fn new(config: CollectionConfig, batch_size: usize) -> Self {
        Self {
            config,
            batch_size,
            known_ids: HashSet::new(),
        }
    }

    /// Posts from an earlier run; the search still pages past them but they
    /// are never collected twice.
    pub fn skip_ids<I>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        self.known_ids.extend(ids);
        self
    }

    /// Collects `fetch_count` posts older than `before`, balanced across the
    /// mode's classes. `current_balance` holds per-class counts already on
    /// disk; the per-class target covers those plus the new posts.
    ///
    /// Stops early, returning what it has, when the source runs dry, the
    /// cursor stops moving, every class is full, or shutdown is requested.
    pub async fn collect<S>(
        &self,
        source: &S,
        before: i64,
        current_balance: Option<&BTreeMap<String, usize>>,
        shutdown: &mut ShutdownListener,
    ) -> Result<Collected>
    where
        S: SubmissionSource + ?Sized,
    {
        let fetch_count = self.config.fetch_count;
        let mut quotas = Quotas::new(self.config.mode, fetch_count, current_balance);
        tracing::info!(
            target: "collect",
            per_class = quotas.classes.target(),
            data_size = fetch_count + quotas.classes.total(),
            mode = ?self.config.mode,
            "starting balanced collection"
        );

        let mut posts = Vec::with_capacity(fetch_count);
        let mut seen = self.known_ids.clone();
        let mut cursor = before;

        while posts.len() < fetch_count {
            if quotas.classes.is_full() {
                tracing::warn!(
                    target: "collect",
                    collected = posts.len(),
                    "every class reached its target before the requested count"
                );
                break;
            }
            if shutdown.is_triggered() {
                tracing::info!(target: "collect", "shutdown requested; stopping collection");
                break;
            }

            tracing::info!(
                target: "collect",
                remaining = fetch_count - posts.len(),
                before = cursor,
                "polling for more posts"
            );
            let batch = tokio::select! {
                res = source.search_before(cursor, self.batch_size) => res?,
                _ = shutdown.notified() => {
                    tracing::info!(target: "collect", "shutdown requested during search");
                    break;
                }
            };

            let Some(next_cursor) = batch.last().map(|post| post.created_utc) else {
                tracing::warn!(
                    target: "collect",
                    before = cursor,
                    collected = posts.len(),
                    "source returned no more posts"
                );
                break;
            };

            for post in &batch {
                if !seen.insert(post.id.clone()) {
                    continue;
                }
                if let Some(record) = self.consider(post, &mut quotas) {
                    posts.push(record);
                }
            }

            if next_cursor >= cursor {
                tracing::warn!(
                    target: "collect",
                    before = cursor,
                    next = next_cursor,
                    "search cursor did not advance; stopping"
                );
                break;
            }
            cursor = next_cursor;
        }

        tracing::info!(
            target: "collect",
            collected = posts.len(),
            counts = ?quotas.classes.counts(),
            "collection finished"
        );
        Ok(Collected {
            posts,
            balance: quotas.classes,
            cursor,
        })
    }

    fn consider(&self, post: &Submission, quotas: &mut Quotas) -> Option<PostRecord> {
        if let Err(reason) = validate_submission(post, self.config.min_upvote_ratio) {
            tracing::trace!(target: "collect", id = %post.id, %reason, "post rejected");
            return None;
        }
        let medium = extract_medium_from_title(&post.title);
        if !quotas.admit(medium) {
            return None;
        }
        tracing::debug!(target: "collect", id = %post.id, %medium, "post accepted");
        Some(PostRecord::new(post, medium))
    }
}

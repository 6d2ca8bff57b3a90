use std::{
    collections::{BTreeMap, HashSet},
    fs,
    path::Path,
};

use anyhow::{Context, Result};

use crate::{
    config::SplitTargets,
    domain::{BinaryClass, PostRecord, Split},
    infrastructure::shutdown::ShutdownListener,
};

use super::{
    downloader::{DownloadOutcome, ImageDownloader, ImageFetcher},
    layout::{class_dir, get_dir_balance, is_partial},
};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StoreReport {
    pub stored: usize,
    pub already_present: usize,
    pub unavailable: usize,
    pub balances: BTreeMap<&'static str, BTreeMap<String, usize>>,
}

fn target_for(targets: &SplitTargets, split: Split) -> usize {
    match split {
        Split::Train => targets.train,
        Split::Test => targets.test,
        Split::Val => targets.val,
    }
}

fn stored_ids(store_path: &Path, class: BinaryClass) -> Result<HashSet<String>> {
    let mut ids = HashSet::new();
    for split in Split::ALL {
        let dir = class_dir(store_path, split, class);
        if !dir.is_dir() {
            continue;
        }
        for entry in fs::read_dir(&dir).with_context(|| format!("failed to scan {}", dir.display()))? {
            let path = entry?.path();
            if is_partial(&path) {
                continue;
            }
            if let Some(stem) = path.file_stem() {
                ids.insert(stem.to_string_lossy().into_owned());
            }
        }
    }
    Ok(ids)
}

/// Downloads the posts of each binary class into the split tree at
/// `store_path`, filling train, then test, then val up to their per-class
/// targets. Existing files count toward the targets, and a post already
/// stored in any split is not placed again.
pub async fn download_and_store_binary<F: ImageFetcher>(
    toc: &[PostRecord],
    store_path: &Path,
    targets: SplitTargets,
    downloader: &ImageDownloader<F>,
    shutdown: &ShutdownListener,
) -> Result<StoreReport> {
    let mut balances = BTreeMap::new();
    for split in Split::ALL {
        let mut balance = get_dir_balance(&store_path.join(split.dir_name()))?;
        for class in BinaryClass::ALL {
            balance.entry(class.dir_name().to_string()).or_insert(0);
        }
        balances.insert(split.dir_name(), balance);
    }

    let mut report = StoreReport::default();
    'classes: for class in BinaryClass::ALL {
        let posts = toc
            .iter()
            .filter(|post| post.medium.binary_class() == class)
            .collect::<Vec<_>>();
        let wanted = targets.total();
        let already_stored = stored_ids(store_path, class)?;

        for (idx, post) in posts.iter().enumerate() {
            if shutdown.is_triggered() {
                tracing::info!(target: "download", "shutdown requested; stopping downloads");
                break 'classes;
            }
            if already_stored.contains(&post.id) {
                report.already_present += 1;
                continue;
            }

            let Some(split) = Split::FILL_ORDER.into_iter().find(|split| {
                balances[split.dir_name()][class.dir_name()] < target_for(&targets, *split)
            }) else {
                tracing::info!(target: "download", %class, "every split is full");
                break;
            };

            tracing::info!(
                target: "download",
                id = %post.id,
                %class,
                %split,
                remaining = wanted.saturating_sub(idx + 1),
                "downloading"
            );
            let outcome = downloader
                .download_image(post, &class_dir(store_path, split, class))
                .await?;
            match &outcome {
                DownloadOutcome::Stored(_) => report.stored += 1,
                DownloadOutcome::AlreadyExists(_) => report.already_present += 1,
                DownloadOutcome::Unavailable { attempts, error } => {
                    tracing::error!(
                        target: "download",
                        id = %post.id,
                        attempts,
                        error = %error,
                        "giving up on image"
                    );
                    report.unavailable += 1;
                }
            }
            if let Some(count) = balances
                .get_mut(split.dir_name())
                .and_then(|balance| balance.get_mut(class.dir_name()))
            {
                *count += outcome.added();
            }
        }
    }

    report.balances = balances;
    Ok(report)
}

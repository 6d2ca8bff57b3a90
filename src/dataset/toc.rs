use std::{collections::HashSet, fs, path::Path};

use anyhow::{Context, Result};

use crate::domain::PostRecord;

/// Loads a saved table of contents; a missing file is an empty one.
pub fn load_toc(path: &Path) -> Result<Vec<PostRecord>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let raw = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_slice(&raw).with_context(|| format!("{} is not a valid toc", path.display()))
}

pub fn save_toc(path: &Path, toc: &[PostRecord]) -> Result<()> {
    let payload = serde_json::to_vec_pretty(toc)?;
    fs::write(path, payload).with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!(target: "dataset", path = %path.display(), posts = toc.len(), "toc saved");
    Ok(())
}

pub fn merge_toc(toc: &mut Vec<PostRecord>, fresh: Vec<PostRecord>) -> usize {
    let mut known: HashSet<String> = toc.iter().map(|post| post.id.clone()).collect();
    let before = toc.len();
    toc.extend(fresh.into_iter().filter(|post| known.insert(post.id.clone())));
    toc.len() - before
}

pub fn find_submission_by_id<'a>(id: &str, toc: &'a [PostRecord]) -> Option<&'a PostRecord> {
    toc.iter().find(|post| post.id == id)
}

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

use crate::domain::{BinaryClass, Split};

pub const BINARY_DIRNAME: &str = "binary_tts";
pub const PARTIAL_EXTENSION: &str = "part";

/// Creates `binary_tts/{train,val,test}/{digital,non_digital}` under `parent`
/// and returns the `binary_tts` path. Existing directories are kept.
pub fn establish_binary_directory(parent: &Path) -> Result<PathBuf> {
    let root = parent.join(BINARY_DIRNAME);
    ensure_split_tree(&root)?;
    Ok(root)
}

/// Creates the split/class tree directly under `root` and removes partial
/// downloads left by an interrupted run.
pub fn ensure_split_tree(root: &Path) -> Result<()> {
    for split in Split::ALL {
        for class in BinaryClass::ALL {
            let dir = class_dir(root, split, class);
            fs::create_dir_all(&dir)
                .with_context(|| format!("failed to create {}", dir.display()))?;
            remove_partials(&dir)?;
        }
    }
    tracing::debug!(target: "dataset", root = %root.display(), "dataset layout ready");
    Ok(())
}

fn remove_partials(dir: &Path) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if is_partial(&path) {
            tracing::warn!(target: "dataset", file = %path.display(), "removing partial download");
            fs::remove_file(&path)
                .with_context(|| format!("failed to remove {}", path.display()))?;
        }
    }
    Ok(())
}

pub fn is_partial(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == PARTIAL_EXTENSION)
}

pub fn class_dir(root: &Path, split: Split, class: BinaryClass) -> PathBuf {
    root.join(split.dir_name()).join(class.dir_name())
}

pub fn get_dir_balance(dir: &Path) -> Result<BTreeMap<String, usize>> {
    let mut balance = BTreeMap::new();
    let entries =
        fs::read_dir(dir).with_context(|| format!("failed to scan {}", dir.display()))?;
    for entry in entries {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let mut count = 0;
        for file in fs::read_dir(entry.path())? {
            if !is_partial(&file?.path()) {
                count += 1;
            }
        }
        balance.insert(entry.file_name().to_string_lossy().into_owned(), count);
    }
    Ok(balance)
}

// Missing split directories count as empty.
pub fn total_balance(root: &Path) -> Result<BTreeMap<String, usize>> {
    let mut totals = BTreeMap::new();
    for split in Split::ALL {
        let dir = root.join(split.dir_name());
        if !dir.is_dir() {
            continue;
        }
        for (class, count) in get_dir_balance(&dir)? {
            *totals.entry(class).or_insert(0) += count;
        }
    }
    Ok(totals)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn establishes_every_split_and_class() {
        let tmp = tempfile::tempdir().unwrap();
        let root = establish_binary_directory(tmp.path()).unwrap();
        for split in ["train", "val", "test"] {
            for class in ["digital", "non_digital"] {
                assert!(root.join(split).join(class).is_dir(), "{split}/{class}");
            }
        }
        // second call is a no-op
        establish_binary_directory(tmp.path()).unwrap();
    }

    #[test]
    fn dir_balance_counts_files_per_class() {
        let tmp = tempfile::tempdir().unwrap();
        let root = establish_binary_directory(tmp.path()).unwrap();
        let train = root.join("train");
        fs::write(train.join("digital/a.jpg"), b"x").unwrap();
        fs::write(train.join("digital/b.png"), b"x").unwrap();
        fs::write(train.join("non_digital/c.jpg"), b"x").unwrap();
        fs::write(train.join("stray.txt"), b"x").unwrap();

        let balance = get_dir_balance(&train).unwrap();
        assert_eq!(balance.get("digital"), Some(&2));
        assert_eq!(balance.get("non_digital"), Some(&1));
        assert_eq!(balance.len(), 2);

        fs::write(root.join("val/digital/d.jpg"), b"x").unwrap();
        let totals = total_balance(&root).unwrap();
        assert_eq!(totals.get("digital"), Some(&3));
        assert_eq!(totals.get("non_digital"), Some(&1));
    }

    #[test]
    fn partial_downloads_are_not_counted_and_get_cleaned() {
        let tmp = tempfile::tempdir().unwrap();
        let root = establish_binary_directory(tmp.path()).unwrap();
        fs::write(root.join("train/digital/a.jpg"), b"x").unwrap();
        fs::write(root.join("train/digital/b.part"), b"x").unwrap();

        assert_eq!(get_dir_balance(&root.join("train")).unwrap()["digital"], 1);
        assert_eq!(total_balance(&root).unwrap()["digital"], 1);

        establish_binary_directory(tmp.path()).unwrap();
        assert!(!root.join("train/digital/b.part").exists());
        assert!(root.join("train/digital/a.jpg").is_file());
    }
}

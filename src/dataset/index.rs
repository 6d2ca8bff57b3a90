use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Labelled image paths of one split. Class ids follow the alphabetical order
/// of the class directories, so `digital` is 0 and `non_digital` is 1.
#[derive(Debug, Clone, Default)]
pub struct DatasetIndex {
    pub class_names: Vec<String>,
    pub samples: Vec<(PathBuf, usize)>,
}

impl DatasetIndex {
    pub fn scan(split_dir: &Path) -> Result<Self> {
        let mut class_dirs = fs::read_dir(split_dir)
            .with_context(|| format!("failed to scan {}", split_dir.display()))?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false))
            .map(|entry| entry.path())
            .collect::<Vec<_>>();
        class_dirs.sort();

        let mut index = Self::default();
        for (class_id, dir) in class_dirs.iter().enumerate() {
            let name = dir
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            index.class_names.push(name);

            let mut images = fs::read_dir(dir)?
                .filter_map(|entry| entry.ok())
                .map(|entry| entry.path())
                .filter(|path| path.is_file() && is_image(path))
                .collect::<Vec<_>>();
            images.sort();
            index
                .samples
                .extend(images.into_iter().map(|path| (path, class_id)));
        }
        Ok(index)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn class_counts(&self) -> Vec<usize> {
        let mut counts = vec![0; self.class_names.len()];
        for (_, class_id) in &self.samples {
            counts[*class_id] += 1;
        }
        counts
    }
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::layout::establish_binary_directory;

    #[test]
    fn labels_follow_alphabetical_class_order() {
        let tmp = tempfile::tempdir().unwrap();
        let root = establish_binary_directory(tmp.path()).unwrap();
        let train = root.join("train");
        fs::write(train.join("non_digital/b.PNG"), b"x").unwrap();
        fs::write(train.join("non_digital/c.jpeg"), b"x").unwrap();
        fs::write(train.join("digital/a.jpg"), b"x").unwrap();
        fs::write(train.join("digital/notes.txt"), b"x").unwrap();
        fs::write(train.join("digital/a.part"), b"x").unwrap();

        let index = DatasetIndex::scan(&train).unwrap();
        assert_eq!(index.class_names, vec!["digital", "non_digital"]);
        assert_eq!(index.len(), 3);
        assert_eq!(index.class_counts(), vec![1, 2]);
        assert_eq!(index.samples[0].1, 0);
        assert!(index.samples[0].0.ends_with("digital/a.jpg"));
        assert!(index.samples.iter().skip(1).all(|(_, id)| *id == 1));
    }
}

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};

use crate::config::DirectoryConfig;

#[derive(Debug, Clone)]
pub struct ResolvedPaths {
    pub logs_dir: PathBuf,
    pub data_dir: PathBuf,
    pub toc_path: PathBuf,
}

pub fn ensure_directories(cfg: &DirectoryConfig) -> Result<ResolvedPaths> {
    let logs_dir = ensure_dir(&cfg.logs_dir)?;
    let data_dir = ensure_dir(&cfg.data_dir)?;

    let marker = data_dir.join(".write-test");
    fs::write(&marker, b"ok")
        .with_context(|| format!("data directory {} is not writable", data_dir.display()))?;
    fs::remove_file(&marker)?;

    Ok(ResolvedPaths {
        logs_dir,
        toc_path: data_dir.join(&cfg.toc_filename),
        data_dir,
    })
}

fn ensure_dir(path: &str) -> Result<PathBuf> {
    let dir = PathBuf::from(path);
    if !dir.exists() {
        fs::create_dir_all(&dir).with_context(|| format!("failed to create directory {}", path))?;
    }
    Ok(dir.canonicalize().unwrap_or(dir))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_dataset_paths_under_data_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = DirectoryConfig {
            logs_dir: tmp.path().join("logs").display().to_string(),
            data_dir: tmp.path().join("data").display().to_string(),
            toc_filename: "toc.json".into(),
        };
        let paths = ensure_directories(&cfg).unwrap();
        assert!(paths.logs_dir.is_dir());
        assert!(paths.data_dir.is_dir());
        assert!(paths.toc_path.ends_with("data/toc.json"));
        assert!(!paths.data_dir.join(".write-test").exists());
    }
}

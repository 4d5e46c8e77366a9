use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

/// Walks a source tree for files with one extension, skipping run and VCS folders.
#[derive(Debug, Clone)]
pub struct SourceFinder {
    extension: Option<String>,
    /// Directory names never descended into, below the base directory
    skip_dirs: Vec<String>,
    max_depth: usize,
}

impl SourceFinder {
    pub fn new() -> Self {
        Self {
            extension: None,
            skip_dirs: vec![
                ".git".into(),
                ".nextflow".into(),
                "work".into(),
                "node_modules".into(),
                "target".into(),
            ],
            max_depth: 16,
        }
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = Some(extension.into());
        self
    }

    fn should_skip(&self, entry: &DirEntry) -> bool {
        entry.depth() > 0
            && entry.file_type().is_dir()
            && self
                .skip_dirs
                .iter()
                .any(|name| entry.file_name() == name.as_str())
    }

    fn wanted(&self, path: &Path) -> bool {
        match &self.extension {
            Some(extension) => path.extension().is_some_and(|ext| ext == extension.as_str()),
            None => true,
        }
    }

    /// Matching files under `base_dir`, sorted by path
    pub fn find(&self, base_dir: &Path) -> Vec<PathBuf> {
        let mut found: Vec<PathBuf> = WalkDir::new(base_dir)
            .max_depth(self.max_depth)
            .follow_links(true)
            .into_iter()
            .filter_entry(|entry| !self.should_skip(entry))
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file() && self.wanted(entry.path()))
            .map(|entry| entry.into_path())
            .collect();
        found.sort();
        debug!("Found {} files under {}", found.len(), base_dir.display());
        found
    }
}

impl Default for SourceFinder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn read_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Reads every file, pairing it with its path. Unreadable or non UTF-8 files are
/// skipped with a warning.
pub fn read_sources(paths: Vec<PathBuf>) -> Vec<(PathBuf, String)> {
    paths
        .into_iter()
        .filter_map(|path| match read_text(&path) {
            Ok(text) => Some((path, text)),
            Err(e) => {
                warn!("Skipping {:#}", e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_finds_files_by_extension_and_skips_vcs() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("modules/fastqc")).unwrap();
        fs::create_dir_all(dir.path().join(".git/objects")).unwrap();
        fs::write(dir.path().join("modules/fastqc/main.nf"), "process FASTQC {}").unwrap();
        fs::write(dir.path().join("modules/fastqc/meta.yml"), "name: fastqc").unwrap();
        fs::write(dir.path().join(".git/objects/x.nf"), "").unwrap();
        fs::write(dir.path().join("main.nf"), "workflow {}").unwrap();

        let found = SourceFinder::new().with_extension("nf").find(dir.path());
        assert_eq!(
            found,
            vec![
                dir.path().join("main.nf"),
                dir.path().join("modules/fastqc/main.nf")
            ]
        );

        let sources = read_sources(found);
        assert_eq!(sources[0].1, "workflow {}");
    }

    #[test]
    fn test_unreadable_source_is_skipped() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.nf"), "process A {}").unwrap();
        fs::write(dir.path().join("b.nf"), [0xff, 0xfe, 0x00]).unwrap();

        let found = SourceFinder::new().with_extension("nf").find(dir.path());
        assert_eq!(found.len(), 2);

        let sources = read_sources(found);
        assert_eq!(sources, vec![(dir.path().join("a.nf"), "process A {}".to_string())]);
    }

    #[test]
    fn test_read_missing_file_has_context() {
        let err = read_text(Path::new("/nonexistent/main.nf")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/main.nf"));
    }
}

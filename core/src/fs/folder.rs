//! Content root handling: folder enumeration and per-folder markdown listings.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::types::FolderSummary;

use super::{Result, date, util};

/// Top-level directories that hold tooling or media rather than browsable documents.
pub const DEFAULT_EXCLUDED_FOLDERS: &[&str] =
    &["오디오", "node_modules", "public", ".git", ".agent", "web-viewer", "client"];

/// A directory tree whose top-level folders are content collections.
#[derive(Debug, Clone)]
pub struct ContentRoot {
    root: PathBuf,
    excluded: Vec<String>,
}

impl ContentRoot {
    /// Content root using [`DEFAULT_EXCLUDED_FOLDERS`].
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_excluded(root, DEFAULT_EXCLUDED_FOLDERS.iter().copied())
    }

    pub fn with_excluded<I, S>(root: impl Into<PathBuf>, excluded: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let excluded = excluded.into_iter().map(|name| util::nfc(name.as_ref())).collect();
        Self { root: root.into(), excluded }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn excluded(&self) -> &[String] {
        &self.excluded
    }

    /// Whether `name` may be browsed at all: not hidden and not on the exclusion list.
    pub fn is_content_folder(&self, name: &str) -> bool {
        if util::is_hidden(name) {
            return false;
        }
        let composed = util::nfc(name);
        !self.excluded.iter().any(|excluded| *excluded == composed)
    }

    /// Enumerate content folders with the timestamp of their newest dated document.
    pub fn list_folders(&self) -> Result<Vec<FolderSummary>> {
        let mut folders = Vec::new();
        for entry in util::read_entries(&self.root)? {
            if !entry.is_dir() || !self.is_content_folder(&entry.name) {
                continue;
            }

            let files = markdown_files(&entry.path)?;
            let latest_date = files.first().and_then(|newest| date::parse_filename_date(newest));
            folders.push(FolderSummary { name: util::nfc(&entry.name), latest_date });
        }

        folders.sort_by(|a, b| a.name.cmp(&b.name));
        debug!(root = %self.root.display(), count = folders.len(), "listed content folders");
        Ok(folders)
    }

    /// Markdown filenames in `folder`, newest first.
    pub fn list_files(&self, folder: &str) -> Result<Vec<String>> {
        let dir = self.resolve_folder(folder)?;
        let files = markdown_files(&dir)?;
        debug!(folder, count = files.len(), "listed folder documents");
        Ok(files)
    }
}

/// Visible `.md` files directly inside `dir`, NFC-normalized and sorted newest first.
///
/// Names are compared after normalization, so the order does not depend on how the filesystem
/// stored them.
fn markdown_files(dir: &Path) -> Result<Vec<String>> {
    let mut files: Vec<String> = util::read_entries(dir)?
        .into_iter()
        .filter(|entry| entry.is_file())
        .filter(|entry| util::is_markdown(&entry.name) && !util::is_hidden(&entry.name))
        .map(|entry| util::nfc(&entry.name))
        .collect();

    files.sort_by(|a, b| b.cmp(a));
    Ok(files)
}

use std::fs;
use std::path::{Path, PathBuf};

use unicode_normalization::UnicodeNormalization;

use crate::error::ResolveError;

use super::Result;

/// Extension (with the dot) that marks a content document.
pub const MARKDOWN_SUFFIX: &str = ".md";

pub fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

pub fn is_markdown(name: &str) -> bool {
    name.ends_with(MARKDOWN_SUFFIX)
}

/// Canonical composed form used for every name comparison and for names sent to clients.
pub fn nfc(name: &str) -> String {
    name.nfc().collect()
}

/// Equality after NFC normalization of both sides.
pub fn names_match(a: &str, b: &str) -> bool {
    a == b || a.nfc().eq(b.nfc())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Dir,
    File,
    Other,
}

/// A directory entry whose name is valid UTF-8.
#[derive(Debug, Clone)]
pub struct DiskEntry {
    pub name: String,
    pub path: PathBuf,
    pub kind: EntryKind,
}

impl DiskEntry {
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Dir
    }

    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }
}

/// Read the immediate children of `dir`. Entries with non UTF-8 names are skipped.
pub fn read_entries(dir: &Path) -> Result<Vec<DiskEntry>> {
    let read_dir = fs::read_dir(dir).map_err(|err| ResolveError::io(dir, err))?;

    let mut entries = Vec::new();
    for entry in read_dir {
        let entry = entry.map_err(|err| ResolveError::io(dir, err))?;
        let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
            continue;
        };

        let path = entry.path();
        // Follow symlinks so linked folders and files behave like real ones.
        let kind = match fs::metadata(&path) {
            Ok(meta) if meta.is_dir() => EntryKind::Dir,
            Ok(meta) if meta.is_file() => EntryKind::File,
            _ => EntryKind::Other,
        };
        entries.push(DiskEntry { name, path, kind });
    }

    Ok(entries)
}

/// Find the child of `dir` named `wanted`, tolerating normalization differences.
///
/// An exact byte match wins over a normalized one, so a directory holding both the composed and
/// decomposed spelling of a name still resolves each request to the entry it literally names.
pub fn find_entry(dir: &Path, wanted: &str) -> Result<Option<DiskEntry>> {
    let entries = read_entries(dir)?;
    let exact = entries.iter().position(|entry| entry.name == wanted);
    let index = exact.or_else(|| entries.iter().position(|entry| names_match(&entry.name, wanted)));
    Ok(index.map(|idx| entries[idx].clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HANGUL_NFC: &str = "\u{B274}\u{C2A4}"; // 뉴스
    const HANGUL_NFD: &str = "\u{1102}\u{1172}\u{1109}\u{1173}";

    #[test]
    fn composed_and_decomposed_names_match() {
        assert_ne!(HANGUL_NFC, HANGUL_NFD);
        assert!(names_match(HANGUL_NFC, HANGUL_NFD));
        assert_eq!(nfc(HANGUL_NFD), HANGUL_NFC);
        assert!(!names_match(HANGUL_NFC, "News"));
    }

    #[test]
    fn exact_match_beats_normalized_match() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(HANGUL_NFD), b"decomposed").unwrap();
        fs::write(dir.path().join(HANGUL_NFC), b"composed").unwrap();

        let hit = find_entry(dir.path(), HANGUL_NFD).unwrap().expect("entry");
        assert_eq!(hit.name, HANGUL_NFD);
        let hit = find_entry(dir.path(), HANGUL_NFC).unwrap().expect("entry");
        assert_eq!(hit.name, HANGUL_NFC);
    }

    #[test]
    fn hidden_and_markdown_predicates() {
        assert!(is_hidden(".git"));
        assert!(!is_hidden("News"));
        assert!(is_markdown("2024-01-01-10:00:00.md"));
        assert!(!is_markdown("cover.png"));
        assert!(!is_markdown("README.MD"));
    }
}

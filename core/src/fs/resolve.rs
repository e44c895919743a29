//! Mapping client-supplied names onto on-disk entries.
//!
//! Clients send composed (NFC) names while some filesystems hand back decomposed (NFD) ones, so
//! nothing here joins a requested name onto a path directly. Every component is looked up among
//! the entries actually present in its parent directory and compared after normalization. This
//! also means a request can never escape the content root: only real child entries are reachable.

use std::fs;
use std::path::PathBuf;

use tracing::debug;

use crate::error::ResolveError;

use super::folder::ContentRoot;
use super::{Result, util};

impl ContentRoot {
    /// Locate the on-disk directory for a requested content folder.
    ///
    /// The exclusion check runs on the requested name first, so excluded folders are reported
    /// as forbidden whether or not they exist.
    pub fn resolve_folder(&self, folder: &str) -> Result<PathBuf> {
        if !self.is_content_folder(folder) {
            return Err(ResolveError::Forbidden(folder.to_string()));
        }

        let entry = util::find_entry(self.root(), folder)?
            .filter(|entry| entry.is_dir())
            .ok_or_else(|| ResolveError::FolderNotFound(folder.to_string()))?;

        if !self.is_content_folder(&entry.name) {
            return Err(ResolveError::Forbidden(entry.name));
        }
        Ok(entry.path)
    }

    /// Resolve a document inside a content folder and return its raw text.
    pub fn read_content(&self, folder: &str, filename: &str) -> Result<String> {
        let path = self.resolve_file(folder, filename)?;
        let bytes = fs::read(&path).map_err(|err| ResolveError::io(&path, err))?;
        debug!(folder, filename, bytes = bytes.len(), "read document");
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Resolve a file directly inside a content folder.
    pub fn resolve_file(&self, folder: &str, filename: &str) -> Result<PathBuf> {
        let dir = self.resolve_folder(folder)?;
        if util::is_hidden(filename) {
            return Err(file_not_found(folder, filename));
        }

        match util::find_entry(&dir, filename)? {
            Some(entry) if entry.is_file() => Ok(entry.path),
            _ => {
                debug!(folder, filename, "document not found");
                Err(file_not_found(folder, filename))
            }
        }
    }

    /// Resolve a `/`-separated path to a file somewhere below a content folder, such as an image
    /// referenced from a document.
    pub fn resolve_asset(&self, folder: &str, relative: &str) -> Result<PathBuf> {
        let mut current = self.resolve_folder(folder)?;
        let not_found = || file_not_found(folder, relative);

        let mut components = relative.split('/').peekable();
        while let Some(component) = components.next() {
            if component.is_empty() || component == ".." || util::is_hidden(component) {
                return Err(not_found());
            }

            let entry = util::find_entry(&current, component)?.ok_or_else(not_found)?;
            let is_last = components.peek().is_none();
            let usable = if is_last { entry.is_file() } else { entry.is_dir() };
            if !usable {
                return Err(not_found());
            }
            current = entry.path;
        }

        Ok(current)
    }
}

fn file_not_found(folder: &str, file: &str) -> ResolveError {
    ResolveError::FileNotFound { folder: folder.to_string(), file: file.to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use tempfile::tempdir;

    const FOLDER_NFC: &str = "\u{B274}\u{C2A4}\u{B808}\u{D130}"; // 뉴스레터
    const FILE_NFC: &str = "\u{C694}\u{C57D}.md"; // 요약.md

    fn nfd(value: &str) -> String {
        use unicode_normalization::UnicodeNormalization;
        value.nfd().collect()
    }

    #[test]
    fn resolves_decomposed_names_from_composed_requests() {
        let dir = tempdir().unwrap();
        let folder = dir.path().join(nfd(FOLDER_NFC));
        fs::create_dir(&folder).unwrap();
        fs::write(folder.join(nfd(FILE_NFC)), "summary body").unwrap();

        let root = ContentRoot::new(dir.path());
        assert_eq!(root.read_content(FOLDER_NFC, FILE_NFC).unwrap(), "summary body");
        assert_eq!(root.read_content(&nfd(FOLDER_NFC), &nfd(FILE_NFC)).unwrap(), "summary body");
        assert_eq!(root.list_files(FOLDER_NFC).unwrap(), vec![FILE_NFC.to_string()]);
    }

    #[test]
    fn missing_file_and_folder_are_not_found() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("News")).unwrap();
        let root = ContentRoot::new(dir.path());

        let err = root.read_content("News", "2024-01-01-10:00:00.md").unwrap_err();
        assert!(matches!(err, ResolveError::FileNotFound { .. }));
        let err = root.read_content("Gone", "2024-01-01-10:00:00.md").unwrap_err();
        assert!(matches!(err, ResolveError::FolderNotFound(_)));
    }

    #[test]
    fn excluded_folders_are_forbidden_for_reads() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("public")).unwrap();
        fs::write(dir.path().join("public").join("index.md"), "x").unwrap();
        let root = ContentRoot::new(dir.path());

        let err = root.read_content("public", "index.md").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);
        let err = root.read_content("..", "etc").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);
    }

    #[test]
    fn unreadable_root_is_an_io_error() {
        let dir = tempdir().unwrap();
        let not_a_dir = dir.path().join("root.txt");
        fs::write(&not_a_dir, "plain file").unwrap();

        for root in [ContentRoot::new(dir.path().join("gone")), ContentRoot::new(&not_a_dir)] {
            let err = root.read_content("News", "a.md").unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Io, "{err}");
            assert!(matches!(err, ResolveError::Io { .. }));
        }
    }

    #[test]
    fn invalid_utf8_is_replaced_not_rejected() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("News")).unwrap();
        fs::write(dir.path().join("News").join("broken.md"), [b'o', b'k', 0xFF]).unwrap();

        let root = ContentRoot::new(dir.path());
        let content = root.read_content("News", "broken.md").unwrap();
        assert!(content.starts_with("ok"));
        assert!(content.ends_with('\u{FFFD}'));
    }

    #[test]
    fn assets_resolve_through_subdirectories_only() {
        let dir = tempdir().unwrap();
        let images = dir.path().join("News").join("images");
        fs::create_dir_all(&images).unwrap();
        fs::write(images.join("pic.png"), b"png").unwrap();
        fs::write(dir.path().join("secret.txt"), b"outside").unwrap();

        let root = ContentRoot::new(dir.path());
        let path = root.resolve_asset("News", "images/pic.png").unwrap();
        assert_eq!(fs::read(path).unwrap(), b"png");

        for bad in ["../secret.txt", "images/../../secret.txt", "", "images", "images//pic.png"] {
            let err = root.resolve_asset("News", bad).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::NotFound, "{bad:?}");
        }
    }
}

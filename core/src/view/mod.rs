//! Framework-independent view model for the browser UI.
//!
//! The whole UI state is one [`ViewState`] value. A host (web front-end, terminal UI, test) feeds
//! it [`ViewEvent`]s and gets back the next state plus the [`FetchRequest`]s to run. Responses
//! come back as events carrying the token of the request that produced them; a response whose
//! token is no longer the outstanding one for its kind is stale and dropped, so a slow file list
//! from a previously selected folder can never overwrite the current one.

mod request;

pub use request::{FetchRequest, FetchTarget, encode_segment};

use tracing::{debug, warn};

use crate::display::{Appearance, DisplayConfig};
use crate::fs::nfc;
use crate::render::render_markdown;
use crate::types::{FolderSummary, RequestToken};

/// Progress of a fetch-backed value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase<T> {
    Loading,
    Loaded(T),
}

impl<T> Phase<T> {
    pub fn loaded(&self) -> Option<&T> {
        match self {
            Phase::Loading => None,
            Phase::Loaded(value) => Some(value),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Phase::Loading)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Dashboard; no folder chosen.
    None,
    Folder { name: String, files: Phase<Vec<String>> },
    File { folder: String, files: Vec<String>, file: String, content: Phase<String> },
}

#[derive(Debug, Clone)]
pub enum ViewEvent {
    FoldersLoaded { token: RequestToken, folders: Vec<FolderSummary> },
    SelectFolder(String),
    FilesLoaded { token: RequestToken, files: Vec<String> },
    SelectFile(String),
    ContentLoaded { token: RequestToken, content: String },
    FetchFailed { token: RequestToken, error: String },
    Search(String),
    /// Back to the dashboard.
    Home,
}

/// Result of a transition.
#[derive(Debug, Clone)]
pub struct Step {
    pub state: ViewState,
    pub requests: Vec<FetchRequest>,
}

impl Step {
    fn idle(state: ViewState) -> Self {
        Self { state, requests: Vec::new() }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Pending {
    folders: Option<RequestToken>,
    files: Option<RequestToken>,
    content: Option<RequestToken>,
}

/// A folder entry paired with how it should be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FolderCard<'a> {
    pub folder: &'a FolderSummary,
    pub appearance: &'a Appearance,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    folders: Vec<FolderSummary>,
    selection: Selection,
    search: String,
    pending: Pending,
    next_token: u64,
}

impl ViewState {
    /// Initial dashboard state and the folder listing request that populates it.
    pub fn start() -> Step {
        let mut state = Self {
            folders: Vec::new(),
            selection: Selection::None,
            search: String::new(),
            pending: Pending::default(),
            next_token: 0,
        };
        let token = state.allocate_token();
        state.pending.folders = Some(token);
        Step { state, requests: vec![FetchRequest { token, target: FetchTarget::Folders }] }
    }

    /// Apply one event.
    pub fn apply(mut self, event: ViewEvent) -> Step {
        match event {
            ViewEvent::FoldersLoaded { token, folders } => {
                if self.pending.folders != Some(token) {
                    debug!(token = token.as_u64(), "dropping stale folder listing");
                    return Step::idle(self);
                }
                self.pending.folders = None;
                self.folders = folders;
                Step::idle(self)
            }
            ViewEvent::SelectFolder(name) => self.select_folder(name),
            ViewEvent::FilesLoaded { token, files } => self.files_loaded(token, files),
            ViewEvent::SelectFile(file) => self.select_file(file),
            ViewEvent::ContentLoaded { token, content } => {
                if self.pending.content != Some(token) {
                    debug!(token = token.as_u64(), "dropping stale document content");
                    return Step::idle(self);
                }
                self.pending.content = None;
                if let Selection::File { content: slot, .. } = &mut self.selection {
                    *slot = Phase::Loaded(content);
                }
                Step::idle(self)
            }
            ViewEvent::FetchFailed { token, error } => {
                warn!(token = token.as_u64(), %error, "fetch failed");
                let pending = &mut self.pending;
                for slot in [&mut pending.folders, &mut pending.files, &mut pending.content] {
                    if *slot == Some(token) {
                        *slot = None;
                    }
                }
                Step::idle(self)
            }
            ViewEvent::Search(query) => {
                self.search = query;
                Step::idle(self)
            }
            ViewEvent::Home => {
                self.selection = Selection::None;
                self.search.clear();
                self.pending.files = None;
                self.pending.content = None;
                Step::idle(self)
            }
        }
    }

    fn select_folder(mut self, name: String) -> Step {
        let token = self.allocate_token();
        self.pending.files = Some(token);
        self.pending.content = None;
        self.search.clear();
        self.selection = Selection::Folder { name: name.clone(), files: Phase::Loading };
        debug!(folder = %name, token = token.as_u64(), "folder selected");
        let request = FetchRequest { token, target: FetchTarget::Files { folder: name } };
        Step { state: self, requests: vec![request] }
    }

    fn files_loaded(mut self, token: RequestToken, files: Vec<String>) -> Step {
        if self.pending.files != Some(token) {
            debug!(token = token.as_u64(), "dropping stale file listing");
            return Step::idle(self);
        }
        self.pending.files = None;

        let folder = match &self.selection {
            Selection::Folder { name, .. } => name.clone(),
            _ => return Step::idle(self),
        };

        match files.first().cloned() {
            // Auto-select the newest document.
            Some(first) => self.load_file(folder, files, first),
            None => {
                self.selection = Selection::Folder { name: folder, files: Phase::Loaded(files) };
                Step::idle(self)
            }
        }
    }

    fn select_file(self, file: String) -> Step {
        let (folder, files) = match &self.selection {
            Selection::Folder { name, files: Phase::Loaded(files) } => {
                (name.clone(), files.clone())
            }
            Selection::File { folder, files, .. } => (folder.clone(), files.clone()),
            _ => {
                debug!(file = %file, "ignoring file selection without a loaded folder");
                return Step::idle(self);
            }
        };
        self.load_file(folder, files, file)
    }

    fn load_file(mut self, folder: String, files: Vec<String>, file: String) -> Step {
        let token = self.allocate_token();
        self.pending.content = Some(token);
        let request = FetchRequest {
            token,
            target: FetchTarget::Content { folder: folder.clone(), file: file.clone() },
        };
        self.selection = Selection::File { folder, files, file, content: Phase::Loading };
        Step { state: self, requests: vec![request] }
    }

    fn allocate_token(&mut self) -> RequestToken {
        self.next_token = self.next_token.wrapping_add(1).max(1);
        RequestToken::new(self.next_token)
    }

    pub fn folders(&self) -> &[FolderSummary] {
        &self.folders
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn current_folder(&self) -> Option<&str> {
        match &self.selection {
            Selection::None => None,
            Selection::Folder { name, .. } => Some(name),
            Selection::File { folder, .. } => Some(folder),
        }
    }

    pub fn current_file(&self) -> Option<&str> {
        match &self.selection {
            Selection::File { file, .. } => Some(file),
            _ => None,
        }
    }

    /// Files of the current folder; empty while the listing is loading.
    pub fn files(&self) -> &[String] {
        match &self.selection {
            Selection::Folder { files: Phase::Loaded(files), .. } => files,
            Selection::File { files, .. } => files,
            _ => &[],
        }
    }

    /// Files that match the search query.
    pub fn visible_files(&self) -> Vec<&str> {
        filter_files(self.files(), &self.search)
    }

    pub fn content(&self) -> Option<&str> {
        match &self.selection {
            Selection::File { content: Phase::Loaded(content), .. } => Some(content),
            _ => None,
        }
    }

    /// Sanitized HTML of the loaded document.
    pub fn rendered_html(&self) -> Option<String> {
        let folder = self.current_folder()?;
        self.content().map(|content| render_markdown(content, folder))
    }

    pub fn folder_cards<'a>(&'a self, display: &'a DisplayConfig) -> Vec<FolderCard<'a>> {
        self.folders
            .iter()
            .map(|folder| FolderCard { folder, appearance: display.appearance_for(&folder.name) })
            .collect()
    }

    /// Whether any fetch is outstanding.
    pub fn is_busy(&self) -> bool {
        self.pending != Pending::default()
    }
}

/// Case-insensitive substring filter over filenames. An empty query keeps everything.
pub fn filter_files<'a>(files: &'a [String], query: &str) -> Vec<&'a str> {
    let needle = nfc(query).to_lowercase();
    files
        .iter()
        .filter(|file| needle.is_empty() || nfc(file).to_lowercase().contains(&needle))
        .map(String::as_str)
        .collect()
}

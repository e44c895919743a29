//! Configuration file support.
//!
//! Every field has a default, so an empty or absent file yields a working setup that serves the
//! current directory. The file is TOML:
//!
//! ```toml
//! [content]
//! root = "/srv/digest"
//! excluded_folders = ["node_modules", "public", "client"]
//!
//! [server]
//! bind = "127.0.0.1:3000"
//!
//! [log]
//! filter = "mdshelf=debug,tower_http=info"
//!
//! [[display.rules]]
//! contains = "Papers"
//! icon = "graduation-cap"
//! color = "#6366f1"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::display::DisplayConfig;
use crate::fs::{ContentRoot, DEFAULT_EXCLUDED_FOLDERS};

const APP_QUALIFIER: &str = "org";
const APP_ORGANISATION: &str = "mdshelf";
const APP_NAME: &str = "mdshelf";

const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub content: ContentSettings,
    pub server: ServerSettings,
    pub log: LogSettings,
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContentSettings {
    /// Directory whose top-level folders are the content collections.
    pub root: PathBuf,
    /// Folder names never listed or served, in addition to hidden entries.
    pub excluded_folders: Vec<String>,
}

impl Default for ContentSettings {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            excluded_folders: DEFAULT_EXCLUDED_FOLDERS.iter().map(|name| name.to_string()).collect(),
        }
    }
}

impl ContentSettings {
    pub fn content_root(&self) -> ContentRoot {
        ContentRoot::with_excluded(&self.root, &self.excluded_folders)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerSettings {
    pub bind: String,
    /// Built front-end bundle. Relative paths resolve against the content root; defaults to
    /// `client/dist` inside it.
    pub static_dir: Option<PathBuf>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self { bind: "0.0.0.0:3000".to_string(), static_dir: None }
    }
}

impl ServerSettings {
    pub fn static_dir(&self, content_root: &Path) -> PathBuf {
        match &self.static_dir {
            Some(dir) if dir.is_absolute() => dir.clone(),
            Some(dir) => content_root.join(dir),
            None => content_root.join("client").join("dist"),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogSettings {
    /// `tracing` filter directive; environment variables take precedence when unset.
    pub filter: Option<String>,
    /// Directory for rolling log files; the platform data directory when unset.
    pub directory: Option<PathBuf>,
    /// Disable the rolling file sink and log to stderr only.
    pub console_only: bool,
    /// Number of rolled files to keep.
    pub retention: Option<usize>,
}

impl Config {
    /// Load configuration from `path`, or from the per-user config file when it exists, or fall
    /// back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::read(path),
            None => match default_config_path().filter(|path| path.is_file()) {
                Some(path) => Self::read(&path),
                None => {
                    debug!("no config file found, using defaults");
                    Ok(Self::default())
                }
            },
        }
    }

    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        let config = toml::from_str(&text)
            .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })?;
        debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }
}

/// Per-user config location, e.g. `~/.config/mdshelf/config.toml` on Linux.
pub fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

pub(crate) fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from(APP_QUALIFIER, APP_ORGANISATION, APP_NAME)
}

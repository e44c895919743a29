//! Core library for the markdown shelf: content resolution, rendering, and the view model.

#![deny(missing_debug_implementations)]

pub mod config;
pub mod display;
pub mod error;
pub mod fs;
pub mod log;
pub mod render;
pub mod types;
pub mod view;

pub type Result<T> = std::result::Result<T, anyhow::Error>;

pub use config::Config;
pub use error::{ErrorKind, ResolveError};
pub use fs::ContentRoot;
pub use types::{FileContent, FolderSummary, RequestToken};
pub use view::{Step, ViewEvent, ViewState};

/// Returns the version of the core crate for logging and the server banner.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

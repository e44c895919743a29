//! File system access layer: content folders, dated markdown files, and name resolution.

pub mod date;
pub mod folder;
mod resolve;
mod util;

pub use date::parse_filename_date;
pub use folder::{ContentRoot, DEFAULT_EXCLUDED_FOLDERS};
pub use util::{is_hidden, is_markdown, names_match, nfc};

/// Shared result type for fs operations.
pub type Result<T> = std::result::Result<T, crate::error::ResolveError>;

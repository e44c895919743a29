//! Fetches the view model asks its host to perform.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::types::RequestToken;

/// Characters `encodeURIComponent` leaves alone.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchTarget {
    Folders,
    Files { folder: String },
    Content { folder: String, file: String },
}

/// One outstanding fetch; the response must be fed back with the same token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub token: RequestToken,
    pub target: FetchTarget,
}

impl FetchRequest {
    /// API path for this fetch, with every name encoded as a single path segment.
    pub fn path(&self) -> String {
        match &self.target {
            FetchTarget::Folders => "/api/folders".to_string(),
            FetchTarget::Files { folder } => format!("/api/files/{}", encode_segment(folder)),
            FetchTarget::Content { folder, file } => {
                format!("/api/content/{}/{}", encode_segment(folder), encode_segment(file))
            }
        }
    }
}

pub fn encode_segment(value: &str) -> String {
    utf8_percent_encode(value, COMPONENT).to_string()
}

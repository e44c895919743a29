//! JSON error responses for the API.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use mdshelf_core::{ErrorKind, ResolveError};
use serde_json::json;
use thiserror::Error;
use tokio::task::JoinError;
use tracing::{debug, error};

#[derive(Debug, Error)]
pub enum ApiError {
    /// `failure` is the client-facing message used when the filesystem read itself fails.
    #[error("{failure}: {source}")]
    Resolve {
        failure: &'static str,
        #[source]
        source: ResolveError,
    },

    #[error("{failure}: blocking task did not complete: {source}")]
    Join {
        failure: &'static str,
        #[source]
        source: JoinError,
    },
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Resolve { source, .. } => match source.kind() {
                ErrorKind::Forbidden => StatusCode::FORBIDDEN,
                ErrorKind::NotFound => StatusCode::NOT_FOUND,
                ErrorKind::Io => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Join { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message placed in the `error` field of the response body.
    pub fn message(&self) -> String {
        match self {
            ApiError::Resolve { source: ResolveError::Forbidden(_), .. } => {
                "Folder not allowed".to_string()
            }
            ApiError::Resolve { source: ResolveError::FolderNotFound(_), .. } => {
                "Folder not found".to_string()
            }
            ApiError::Resolve { source: ResolveError::FileNotFound { .. }, .. } => {
                "File not found".to_string()
            }
            ApiError::Resolve { failure, source: ResolveError::Io { source, .. } } => {
                format!("{failure}: {source}")
            }
            ApiError::Join { failure, .. } => failure.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        } else {
            debug!(error = %self, %status, "request rejected");
        }
        (status, Json(json!({ "error": self.message() }))).into_response()
    }
}

//! JSON API handlers.

use std::path::Path as FsPath;
use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use mdshelf_core::{ContentRoot, FileContent, FolderSummary, ResolveError};
use tower_http::services::ServeDir;

use crate::error::ApiError;

/// Shared, read-only request state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub(crate) content: Arc<ContentRoot>,
    pub(crate) frontend: ServeDir,
}

impl AppState {
    pub fn new(content: ContentRoot, static_dir: impl AsRef<FsPath>) -> Self {
        Self { content: Arc::new(content), frontend: ServeDir::new(static_dir) }
    }

    pub fn content(&self) -> &ContentRoot {
        &self.content
    }
}

/// `GET /api/folders`
pub async fn list_folders(
    State(state): State<AppState>,
) -> Result<Json<Vec<FolderSummary>>, ApiError> {
    let content = Arc::clone(&state.content);
    let folders = blocking("Failed to read directories", move || content.list_folders()).await?;
    Ok(Json(folders))
}

/// `GET /api/files/{folder}`
pub async fn list_files(
    State(state): State<AppState>,
    Path(folder): Path<String>,
) -> Result<Json<Vec<String>>, ApiError> {
    let content = Arc::clone(&state.content);
    let files = blocking("Failed to read files", move || content.list_files(&folder)).await?;
    Ok(Json(files))
}

/// `GET /api/content/{folder}/{filename}`
pub async fn read_content(
    State(state): State<AppState>,
    Path((folder, filename)): Path<(String, String)>,
) -> Result<Json<FileContent>, ApiError> {
    let content = Arc::clone(&state.content);
    let text =
        blocking("Failed to read file", move || content.read_content(&folder, &filename)).await?;
    Ok(Json(FileContent { content: text }))
}

/// Run a filesystem operation on the blocking pool.
pub(crate) async fn blocking<T, F>(failure: &'static str, task: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, ResolveError> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(task).await {
        Ok(result) => result.map_err(|source| ApiError::Resolve { failure, source }),
        Err(source) => Err(ApiError::Join { failure, source }),
    }
}

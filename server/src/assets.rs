//! Files served next to the documents (images) and the packaged front-end.

use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::{Path, Request, State};
use axum::response::{IntoResponse, Response};
use tower::ServiceExt;
use tower_http::services::ServeFile;
use tracing::debug;

use crate::routes::{AppState, blocking};

/// `GET /{folder}/{*path}`: a file inside a content folder, or the front-end when the path does
/// not resolve to one.
pub async fn folder_asset(
    State(state): State<AppState>,
    Path((folder, path)): Path<(String, String)>,
    request: Request,
) -> Response {
    let content = Arc::clone(&state.content);
    let (wanted_folder, wanted_path) = (folder.clone(), path.clone());
    let resolved = blocking("Failed to read file", move || {
        content.resolve_asset(&wanted_folder, &wanted_path)
    })
    .await;

    match resolved {
        Ok(file) => match ServeFile::new(file).oneshot(request).await {
            Ok(response) => response.into_response(),
            Err(never) => match never {},
        },
        Err(err) if err.status().is_server_error() => err.into_response(),
        Err(err) => {
            debug!(%folder, %path, error = %err, "not a content asset, serving front-end");
            frontend(state, request).await
        }
    }
}

/// Hand the request to the front-end directory service.
pub async fn frontend(state: AppState, request: Request) -> Response {
    let result: Result<_, Infallible> = state.frontend.oneshot(request).await;
    match result {
        Ok(response) => response.into_response(),
        Err(never) => match never {},
    }
}

//! HTTP front for a shelf of markdown folders.
//!
//! Routes:
//! - `GET /api/folders`: content folders with the date of their newest document
//! - `GET /api/files/{folder}`: markdown filenames, newest first
//! - `GET /api/content/{folder}/{filename}`: `{ "content": ... }`
//! - `GET /{folder}/{*path}`: files stored inside a content folder
//! - everything else: the packaged front-end

pub mod assets;
pub mod cli;
pub mod error;
pub mod routes;

use std::io::Write;

use anyhow::{Context, Result};
use axum::Router;
use axum::routing::get;
use mdshelf_core::Config;
use mdshelf_core::fs::nfc;
use mdshelf_core::log::{LogConfig, LogLevel};
use mdshelf_core::render::render_markdown;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::cli::{Cli, Command};

pub use crate::error::ApiError;
pub use crate::routes::AppState;

pub fn router(state: AppState) -> Router {
    let frontend = state.frontend.clone();
    Router::new()
        .route("/api/folders", get(routes::list_folders))
        .route("/api/files/{folder}", get(routes::list_files))
        .route("/api/content/{folder}/{filename}", get(routes::read_content))
        .route("/{folder}/{*path}", get(assets::folder_asset))
        .fallback_service(frontend)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load(cli.config.as_deref()).context("loading configuration")?;
    cli.apply_overrides(&mut config);

    match cli.command() {
        Command::Serve => {
            let mut log_config = LogConfig::from_settings(&config.log);
            if cfg!(debug_assertions) {
                log_config.console_level = LogLevel::DEBUG;
            }
            if let Err(err) = mdshelf_core::log::init(log_config) {
                eprintln!("failed to initialise logging: {err:#}");
            }
            serve(config).await
        }
        Command::Render { folder, file } => {
            let mut log_config = LogConfig::from_settings(&config.log).console_only();
            log_config.console_level = LogLevel::WARN;
            if let Err(err) = mdshelf_core::log::init(log_config) {
                eprintln!("failed to initialise logging: {err:#}");
            }
            render(&config, &folder, &file)
        }
    }
}

async fn serve(config: Config) -> Result<()> {
    let content = config.content.content_root();
    let static_dir = config.server.static_dir(content.root());
    info!(
        version = mdshelf_core::version(),
        root = %content.root().display(),
        static_dir = %static_dir.display(),
        "content root ready"
    );

    let state = AppState::new(content, &static_dir);
    let listener = TcpListener::bind(&config.server.bind)
        .await
        .with_context(|| format!("binding {}", config.server.bind))?;
    info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("running http server")
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(%err, "failed to listen for ctrl-c");
    }
    info!("shutting down");
}

fn render(config: &Config, folder: &str, file: &str) -> Result<()> {
    let content = config.content.content_root();
    let markdown = content
        .read_content(folder, file)
        .with_context(|| format!("reading {folder}/{file}"))?;
    let html = render_markdown(&markdown, &nfc(folder));

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{html}").context("writing rendered html")?;
    Ok(())
}

//! Logging bootstrap for the shelf server and tools.
//!
//! Wires the `tracing` ecosystem together: an env-filter, a stderr console sink, and an optional
//! rolling file sink with retention pruning. Records emitted through the `log` crate (the HTML
//! sanitizer's parser uses it) are forwarded into `tracing`. Call [`init`] once on startup; later
//! calls hand back the handle installed by the first one.

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::SystemTime;

use anyhow::{Context, Result};
use tracing_log::AsLog;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, filter::LevelFilter, util::SubscriberInitExt};

use crate::config::{LogSettings, project_dirs};

const DEFAULT_ENV_FILTER_VARS: [&str; 2] = ["MDSHELF_LOG", "RUST_LOG"];
const DEFAULT_RETENTION: usize = 14;

static LOG_HANDLE: OnceLock<LogHandle> = OnceLock::new();

/// Re-export of the level filter type to avoid leaking `tracing-subscriber` to callers.
pub use tracing_subscriber::filter::LevelFilter as LogLevel;

/// Rolling file sink settings.
#[derive(Debug, Clone)]
pub struct FileSink {
    pub directory: PathBuf,
    /// File name prefix for generated log files (suffix is `.log`).
    pub prefix: String,
    /// Maximum number of rolled files to keep. `None` disables pruning.
    pub retention: Option<usize>,
    pub level: LevelFilter,
}

/// Configuration for the logging system.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// `None` logs to the console only.
    pub file: Option<FileSink>,
    pub console_level: LevelFilter,
    /// Whether to capture `log` crate records and forward them into `tracing`.
    pub capture_log: bool,
    /// Filter directive (e.g. `mdshelf_server=debug,tower_http=info`).
    pub env_filter: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        let file = FileSink {
            directory: default_log_directory(),
            prefix: "mdshelf".to_string(),
            retention: Some(DEFAULT_RETENTION),
            level: LevelFilter::DEBUG,
        };

        Self {
            file: Some(file),
            console_level: LevelFilter::INFO,
            capture_log: true,
            env_filter: env_directive(),
        }
    }
}

impl LogConfig {
    /// Defaults overridden by the `[log]` section of the config file.
    ///
    /// An environment filter (`MDSHELF_LOG`, then `RUST_LOG`) beats the file's `filter`.
    pub fn from_settings(settings: &LogSettings) -> Self {
        let mut config = Self::default();
        if config.env_filter.is_none() {
            config.env_filter = settings.filter.clone();
        }

        if settings.console_only {
            config.file = None;
        } else if let Some(file) = config.file.as_mut() {
            if let Some(directory) = &settings.directory {
                file.directory = directory.clone();
            }
            if let Some(retention) = settings.retention {
                file.retention = Some(retention);
            }
        }
        config
    }

    pub fn console_only(mut self) -> Self {
        self.file = None;
        self
    }
}

/// Handle returned from [`init`]; owns the background writer of the file sink.
#[derive(Debug)]
pub struct LogHandle {
    _guard: Option<tracing_appender::non_blocking::WorkerGuard>,
    directory: Option<PathBuf>,
}

impl LogHandle {
    /// Directory backing the rolling file sink, if one is installed.
    pub fn directory(&self) -> Option<&Path> {
        self.directory.as_deref()
    }
}

/// Initialise the global logging subscriber. The first invocation wins.
pub fn init(config: LogConfig) -> Result<&'static LogHandle> {
    if let Some(handle) = LOG_HANDLE.get() {
        return Ok(handle);
    }

    let handle = setup(config)?;
    let _ = LOG_HANDLE.set(handle);
    LOG_HANDLE.get().context("log handle missing after initialisation")
}

fn setup(config: LogConfig) -> Result<LogHandle> {
    let max_level = config
        .file
        .as_ref()
        .map(|file| file.level.max(config.console_level))
        .unwrap_or(config.console_level);
    if config.capture_log {
        install_log_tracer(max_level);
    }

    let (file_layer, guard, directory) = match config.file {
        Some(sink) => {
            fs::create_dir_all(&sink.directory).with_context(|| {
                format!("creating log directory at {}", sink.directory.display())
            })?;

            if let Some(retention) = sink.retention.filter(|r| *r > 0) {
                prune_old_logs(&sink.directory, &sink.prefix, retention)
                    .context("applying log retention policy")?;
            }

            let rolling = tracing_appender::rolling::Builder::new()
                .rotation(tracing_appender::rolling::Rotation::DAILY)
                .filename_prefix(&sink.prefix)
                .filename_suffix("log")
                .build(&sink.directory)
                .context("creating rolling log appender")?;
            let (writer, guard) = tracing_appender::non_blocking(rolling);

            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer)
                .with_file(true)
                .with_line_number(true)
                .with_filter(sink.level);
            (Some(layer), Some(guard), Some(sink.directory))
        }
        None => (None, None, None),
    };

    let directive = config
        .env_filter
        .filter(|directive| !directive.trim().is_empty())
        .unwrap_or_else(|| if cfg!(debug_assertions) { "debug" } else { "info" }.to_string());
    let env_filter = EnvFilter::try_new(directive).context("parsing env filter directive")?;

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(config.console_level);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .map_err(|err| anyhow::anyhow!(err))?;

    Ok(LogHandle { _guard: guard, directory })
}

fn install_log_tracer(max_level: LevelFilter) {
    let log_level: log::LevelFilter = max_level.as_log();
    // Fails only when another logger is installed already, which is fine.
    let _ = tracing_log::LogTracer::builder().with_max_level(log_level).init();
}

fn prune_old_logs(dir: &Path, prefix: &str, retention: usize) -> Result<()> {
    let mut entries: Vec<_> = fs::read_dir(dir)
        .with_context(|| format!("reading log directory at {}", dir.display()))?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.metadata().map(|meta| meta.is_file()).unwrap_or(false))
        .filter(|entry| matches_prefix(&entry.path(), prefix))
        .map(|entry| {
            let modified =
                entry.metadata().and_then(|meta| meta.modified()).unwrap_or(SystemTime::UNIX_EPOCH);
            (entry.path(), modified)
        })
        .collect();

    if entries.len() <= retention {
        return Ok(());
    }

    entries.sort_by_key(|(_, modified)| *modified);
    let excess = entries.len().saturating_sub(retention);
    for (path, _) in entries.into_iter().take(excess) {
        let _ = fs::remove_file(&path);
    }

    Ok(())
}

fn matches_prefix(path: &Path, prefix: &str) -> bool {
    path.file_stem().and_then(OsStr::to_str).map(|stem| stem.starts_with(prefix)).unwrap_or(false)
}

fn env_directive() -> Option<String> {
    DEFAULT_ENV_FILTER_VARS
        .iter()
        .find_map(|var| std::env::var(var).ok())
        .filter(|directive| !directive.trim().is_empty())
}

fn default_log_directory() -> PathBuf {
    match project_dirs() {
        Some(dirs) => dirs.data_dir().join("logs"),
        None => std::env::temp_dir().join("mdshelf-logs"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_override_defaults() {
        let settings = LogSettings {
            filter: Some("mdshelf_core=trace".to_string()),
            directory: Some(PathBuf::from("/var/log/mdshelf")),
            console_only: false,
            retention: Some(3),
        };

        let config = LogConfig::from_settings(&settings);
        let file = config.file.expect("file sink");
        assert_eq!(file.directory, PathBuf::from("/var/log/mdshelf"));
        assert_eq!(file.retention, Some(3));
        if env_directive().is_none() {
            assert_eq!(config.env_filter.as_deref(), Some("mdshelf_core=trace"));
        }
    }

    #[test]
    fn console_only_drops_file_sink() {
        let settings = LogSettings { console_only: true, ..LogSettings::default() };
        assert!(LogConfig::from_settings(&settings).file.is_none());
    }

    #[test]
    fn prunes_oldest_files_beyond_retention() {
        let temp = tempfile::tempdir().expect("temp dir");
        for idx in 0..5u64 {
            let path = temp.path().join(format!("mdshelf.2024-01-0{idx}.log"));
            fs::write(&path, b"x").unwrap();
            let stamp = SystemTime::UNIX_EPOCH + std::time::Duration::from_secs(1_000 + idx);
            fs::File::options().write(true).open(&path).unwrap().set_modified(stamp).unwrap();
        }
        fs::write(temp.path().join("other.log"), b"x").unwrap();

        prune_old_logs(temp.path(), "mdshelf", 2).unwrap();

        let mut left: Vec<String> = fs::read_dir(temp.path())
            .unwrap()
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect();
        left.sort();
        assert_eq!(left, vec!["mdshelf.2024-01-03.log", "mdshelf.2024-01-04.log", "other.log"]);
    }

    // The only test that installs the global subscriber.
    #[test]
    fn init_is_idempotent_and_keeps_debug_sinks_live() {
        let temp = tempfile::tempdir().expect("temp dir");
        let mut config = LogConfig::default();
        config.env_filter = None;
        config.console_level = LevelFilter::DEBUG;
        if let Some(file) = config.file.as_mut() {
            file.directory = temp.path().join("logs");
            file.prefix = "test-log".to_string();
        }

        let first = init(config.clone()).expect("init once");
        assert!(first.directory().is_some_and(Path::exists));
        if cfg!(debug_assertions) {
            assert!(tracing::enabled!(tracing::Level::DEBUG));
        }

        let second = init(config).expect("init twice");
        assert!(std::ptr::eq(first, second));
    }
}

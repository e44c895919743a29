//! Command line surface of the `mdshelf` binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use mdshelf_core::Config;

#[derive(Debug, Parser)]
#[command(name = "mdshelf", version, about = "Serve folders of dated markdown documents")]
pub struct Cli {
    /// Config file; defaults to the per-user config location when present.
    #[arg(long, env = "MDSHELF_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Content root whose top-level folders are browsed.
    #[arg(long, env = "MDSHELF_ROOT", global = true)]
    pub root: Option<PathBuf>,

    /// Listen address, e.g. `127.0.0.1:3000`.
    #[arg(long, env = "MDSHELF_BIND", global = true)]
    pub bind: Option<String>,

    /// Built front-end served for every path the API does not claim.
    #[arg(long, env = "MDSHELF_STATIC_DIR", global = true)]
    pub static_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Start the HTTP server (default).
    Serve,
    /// Print the sanitized HTML of one document.
    Render { folder: String, file: String },
}

impl Cli {
    /// Flags win over the config file.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(root) = &self.root {
            config.content.root = root.clone();
        }
        if let Some(bind) = &self.bind {
            config.server.bind = bind.clone();
        }
        if let Some(dir) = &self.static_dir {
            config.server.static_dir = Some(dir.clone());
        }
    }

    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Serve)
    }
}

use clap::Parser;

use mdshelf_server::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    mdshelf_server::run(Cli::parse()).await
}

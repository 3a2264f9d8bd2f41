//! Warden: password authentication and session lifecycle.
//!
//! Entry point for the `warden` command-line tool.

use clap::Parser;

mod app;
mod commands;
mod output;

use commands::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    cli.execute().await
}

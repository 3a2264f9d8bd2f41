//! CLI command definitions and dispatch.

pub mod credential;
pub mod migrate;
pub mod pad;
pub mod session;

use clap::{Parser, Subcommand};

use warden_core::result::AppResult;

use crate::app::{self, App};

/// Warden: password authentication and session lifecycle
#[derive(Debug, Parser)]
#[command(name = "warden", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Apply database migrations
    Migrate,
    /// Create a credential
    Register(credential::RegisterArgs),
    /// Authenticate and issue a session token
    Login(credential::LoginArgs),
    /// Change a password
    Passwd(credential::PasswdArgs),
    /// Validate a session token and extend its expiry
    Validate(session::TokenArgs),
    /// Revoke a session token
    Logout(session::TokenArgs),
    /// One-time pad hand-offs
    Pad(pad::PadArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> anyhow::Result<()> {
        let config = app::load_config(&self.config)?;
        app::init_logging(&config);

        if let Commands::Migrate = self.command {
            return Ok(migrate::execute(&config).await?);
        }

        let app = App::build(&config).await?;
        let result = self.dispatch(&app).await;
        app.shutdown().await;
        Ok(result?)
    }

    async fn dispatch(&self, app: &App) -> AppResult<()> {
        match &self.command {
            Commands::Migrate => Ok(()),
            Commands::Register(args) => credential::register(app, args).await,
            Commands::Login(args) => credential::login(app, args).await,
            Commands::Passwd(args) => credential::passwd(app, args).await,
            Commands::Validate(args) => session::validate(app, args).await,
            Commands::Logout(args) => session::logout(app, args).await,
            Commands::Pad(args) => pad::execute(app, args).await,
        }
    }
}

//! Session token commands.

use clap::Args;

use warden_core::result::AppResult;

use crate::app::App;
use crate::output;

/// A session token argument.
#[derive(Debug, Args)]
pub struct TokenArgs {
    /// Session token
    pub token: String,
}

pub async fn validate(app: &App, args: &TokenArgs) -> AppResult<()> {
    let grant = app.sessions.valid(&args.token).await?;
    output::print_item(&grant);
    Ok(())
}

pub async fn logout(app: &App, args: &TokenArgs) -> AppResult<()> {
    app.sessions.logout(&args.token).await?;
    output::print_success("Session revoked");
    Ok(())
}

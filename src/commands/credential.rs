//! Credential commands.

use clap::Args;
use serde::Serialize;

use warden_core::result::AppResult;
use warden_entity::{CredentialLookup, Profile, SessionGrant};

use crate::app::App;
use crate::output;

/// Arguments for `register`.
#[derive(Debug, Args)]
pub struct RegisterArgs {
    /// Login name
    pub login_name: String,
    /// Password
    #[arg(long)]
    pub password: String,
}

/// Arguments for `login`.
#[derive(Debug, Args)]
pub struct LoginArgs {
    /// User id or login name
    pub identifier: String,
    /// Password
    #[arg(long)]
    pub password: String,
    /// Remote address recorded on the session
    #[arg(long, default_value = "127.0.0.1")]
    pub remote: String,
}

/// Arguments for `passwd`.
#[derive(Debug, Args)]
pub struct PasswdArgs {
    /// User id or login name
    pub identifier: String,
    /// Current password
    #[arg(long)]
    pub old: String,
    /// New password
    #[arg(long)]
    pub new: String,
}

#[derive(Serialize)]
struct LoginOutput {
    profile: Profile,
    session: SessionGrant,
}

pub async fn register(app: &App, args: &RegisterArgs) -> AppResult<()> {
    let profile = app.login.register(&args.login_name, &args.password).await?;
    output::print_item(&profile);
    Ok(())
}

/// Authenticate, then mint a session for the authenticated user.
pub async fn login(app: &App, args: &LoginArgs) -> AppResult<()> {
    let lookup = CredentialLookup::parse(&args.identifier);
    let profile = app.login.login(&lookup, &args.password).await?;
    let session = app.sessions.login(profile.user_id, &args.remote).await?;
    output::print_item(&LoginOutput { profile, session });
    Ok(())
}

pub async fn passwd(app: &App, args: &PasswdArgs) -> AppResult<()> {
    let lookup = CredentialLookup::parse(&args.identifier);
    app.login.change_password(&lookup, &args.old, &args.new).await?;
    output::print_success("Password changed");
    Ok(())
}

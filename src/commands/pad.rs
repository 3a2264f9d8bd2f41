//! One-time pad commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use uuid::Uuid;

use warden_core::result::AppResult;
use warden_entity::CredentialLookup;

use crate::app::App;
use crate::output;

/// Arguments for `pad`.
#[derive(Debug, Args)]
pub struct PadArgs {
    #[command(subcommand)]
    pub command: PadCommand,
}

#[derive(Debug, Subcommand)]
pub enum PadCommand {
    /// Issue a pad for a user
    Issue {
        /// User id or login name
        identifier: String,
        /// Where the pad sends its redeemer
        #[arg(long)]
        redirect: String,
        /// Remote address recorded on the pad
        #[arg(long, default_value = "127.0.0.1")]
        remote: String,
    },
    /// Show where a pad redirects
    Redeem {
        /// Pad value
        pad: String,
    },
    /// Consume a pad, revoke every session of its owner, and reset the password
    Complete {
        /// Pad value
        pad: String,
    },
}

#[derive(Serialize)]
struct RedeemOutput {
    redirect: String,
}

#[derive(Serialize)]
struct CompleteOutput {
    user_id: Uuid,
    password: String,
}

pub async fn execute(app: &App, args: &PadArgs) -> AppResult<()> {
    match &args.command {
        PadCommand::Issue {
            identifier,
            redirect,
            remote,
        } => {
            let profile = app
                .login
                .profile(&CredentialLookup::parse(identifier))
                .await?;
            let grant = app
                .sessions
                .issue_pad(profile.user_id, remote, redirect)
                .await?;
            output::print_item(&grant);
        }
        PadCommand::Redeem { pad } => {
            let redirect = app.sessions.redeem_pad(pad).await?;
            output::print_item(&RedeemOutput { redirect });
        }
        PadCommand::Complete { pad } => {
            let user_id = app.sessions.complete_pad(pad).await?;
            let password = app.login.reset_password(user_id).await?;
            output::print_item(&CompleteOutput { user_id, password });
        }
    }
    Ok(())
}

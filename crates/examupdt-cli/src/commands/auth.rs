//! Login, logout and whoami.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use examupdt_core::IdentityProvider;
use tracing::warn;

use crate::client::{ApiClient, HttpIdentityProvider};
use crate::output;
use crate::session::{self, StoredSession};

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Admin email address
    #[arg(long)]
    pub email: String,

    /// Admin password
    #[arg(long, env = "EXAMUPDT_PASSWORD", hide_env_values = true)]
    pub password: String,
}

pub async fn login(service_url: &str, args: LoginArgs) -> Result<()> {
    let provider = HttpIdentityProvider::new(ApiClient::new(service_url)?);

    eprintln!("{}", "Signing in...".dimmed());
    let signed_in = provider
        .sign_in(&args.email, &args.password)
        .await
        .context("Failed to sign in")?;

    let stored = StoredSession::new(service_url, signed_in);
    session::save(&stored).context("Failed to save session")?;

    output::success("Signed in");
    println!();
    output::field("Email", &stored.user.email);
    output::field("Service", service_url);
    Ok(())
}

pub async fn logout(service_url: &str) -> Result<()> {
    let Some(stored) = session::load().context("Failed to load session")? else {
        output::notice("No active session.");
        return Ok(());
    };

    let provider = HttpIdentityProvider::new(ApiClient::new(&stored.service_url)?);
    if let Err(err) = provider.sign_out(&stored.token).await {
        // The local session goes regardless.
        warn!(error = %err, service_url, "Service did not confirm sign-out");
    }
    session::clear()?;
    output::success("Signed out");
    Ok(())
}

pub async fn whoami(service_url: &str) -> Result<()> {
    let (_, session) = super::admin_client(service_url).await?;
    output::field("Email", &session.user.email);
    if let Some(name) = &session.user.name {
        output::field("Name", name);
    }
    output::field("User ID", &session.user.id);
    Ok(())
}

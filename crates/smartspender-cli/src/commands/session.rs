//! Session commands: login, logout, whoami

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::client::{ApiClient, Session};

/// Resolve `--session`, falling back to the default location
pub fn session_path(explicit: Option<&Path>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path.to_path_buf()),
        None => Session::default_path(),
    }
}

/// Load the saved session and build an authenticated client
pub fn require_client(session_path: &Path) -> Result<ApiClient> {
    let session = Session::load(session_path)?
        .context("Not logged in. Run 'smartspender login' first")?;
    Ok(ApiClient::from_session(&session))
}

pub async fn cmd_login(session_path: &Path, server: &str, email: &str, password: &str) -> Result<Session> {
    let client = ApiClient::new(server);
    let auth = client.login(email, password).await.context("Login failed")?;

    let session = Session {
        base_url: client.base_url().to_string(),
        token: auth.token,
        user: auth.user,
    };
    session.save(session_path)?;
    info!(path = %session_path.display(), "Saved session");

    println!("✅ Logged in as {} <{}>", session.user.name, session.user.email);
    Ok(session)
}

pub fn cmd_logout(session_path: &Path) -> Result<()> {
    if Session::clear(session_path)? {
        println!("👋 Logged out");
    } else {
        println!("Not logged in");
    }
    Ok(())
}

pub async fn cmd_whoami(session_path: &Path) -> Result<()> {
    let client = require_client(session_path)?;
    let user = client.me().await?;

    println!("👤 {} <{}>", user.name, user.email);
    println!("   Server: {}", client.base_url());
    println!("   Member since: {}", user.created_at.format("%Y-%m-%d"));
    Ok(())
}

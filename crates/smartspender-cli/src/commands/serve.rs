//! Server command implementation

use std::path::Path;

use anyhow::{Context, Result};
use smartspender_server::ServerConfig;

use super::open_db;

pub async fn cmd_serve(db_path: &Path, host: &str, port: u16) -> Result<()> {
    println!("🚀 Starting SmartSpender API server...");
    println!("   Database: {}", db_path.display());
    println!("   Listening: http://{}:{}", host, port);

    let config = ServerConfig::from_env()?;
    println!("   🔒 Authentication: bearer tokens ({}h lifetime)", config.token_ttl_hours);
    if !config.allowed_origins.is_empty() {
        println!(
            "   🌐 Allowed origins: {} (SMARTSPENDER_ALLOWED_ORIGINS)",
            config.allowed_origins.join(", ")
        );
    }

    let db = open_db(db_path)?;

    smartspender_server::serve_with_config(db, host, port, config)
        .await
        .context("Server error")
}

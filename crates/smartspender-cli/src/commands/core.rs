//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` - Shared utility to open the database
//! - `cmd_init` - Initialize the database
//! - `cmd_user_add` - Create a user without going through the API

use std::path::Path;

use anyhow::{Context, Result};
use smartspender_core::{auth, db::Database, models::User};

/// Open (creating if needed) the database at `db_path`
pub fn open_db(db_path: &Path) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .context("Database path is not valid UTF-8")?;
    Database::new(path_str).context("Failed to open database")
}

pub fn cmd_init(db_path: &Path) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    let db = open_db(db_path)?;
    let users = db.count_users()?;
    println!("   Path:  {}", db.path());
    println!("   Users: {}", users);

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Create a user: smartspender user add --email you@example.com --name You --password ...");
    println!("  2. Start the API: SMARTSPENDER_JWT_SECRET=... smartspender serve");
    println!("  3. Sign in: smartspender login --email you@example.com --password ...");

    Ok(())
}

pub fn cmd_user_add(db: &Database, email: &str, name: &str, password: &str) -> Result<User> {
    let user = auth::register_user(db, email, name, password).context("Failed to create user")?;
    println!("✅ Created user {} <{}> (id {})", user.name, user.email, user.id);
    Ok(user)
}

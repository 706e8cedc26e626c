//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Local database commands (init, user add) and shared utilities (open_db)
//! - `serve` - Web server command
//! - `session` - Login, logout, whoami and loading the saved session
//! - `expenses` - Expense commands (list, add, update, delete)
//! - `insights` - Stats and AI insight commands
//! - `export` - CSV export

pub mod core;
pub mod expenses;
pub mod export;
pub mod insights;
pub mod serve;
pub mod session;

// Re-export command functions for main.rs
pub use core::*;
pub use expenses::*;
pub use export::*;
pub use insights::*;
pub use serve::*;
pub use session::*;

use anyhow::{Context, Result};
use chrono::NaiveDate;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Parse a `YYYY-MM-DD` command-line date
pub fn parse_date_arg(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// SmartSpender - Track expenses and get AI-assisted insights
#[derive(Parser)]
#[command(name = "smartspender")]
#[command(about = "Expense tracker with budget prediction and anomaly detection", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path (used by init, serve and user)
    #[arg(long, default_value = "smartspender.db", global = true)]
    pub db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Session file (defaults to <config dir>/smartspender/session.toml)
    #[arg(long, global = true)]
    pub session: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Start the API server
    ///
    /// Requires SMARTSPENDER_JWT_SECRET. The AI service is configured with
    /// AI_BACKEND, AI_SERVICE_URL and AI_SERVICE_TIMEOUT_SECS.
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "5000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },

    /// Manage users directly in the database
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Sign in to a SmartSpender server and save the session
    Login {
        /// Account email
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(short, long)]
        password: String,

        /// Server base URL
        #[arg(long, default_value = "http://localhost:5000")]
        server: String,
    },

    /// Forget the saved session
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Manage expenses (list, add, update, delete)
    Expenses {
        #[command(subcommand)]
        action: Option<ExpensesAction>,
    },

    /// Show totals by category and month
    Stats,

    /// Run AI insights (falls back to local analysis when the service is down)
    Insights {
        #[command(subcommand)]
        action: InsightsAction,
    },

    /// Export expenses to CSV
    Export {
        /// Output file
        #[arg(short, long)]
        output: PathBuf,

        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// End date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum UserAction {
    /// Create a user
    Add {
        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        password: String,
    },
}

#[derive(Subcommand)]
pub enum ExpensesAction {
    /// List expenses, newest first
    List {
        /// Maximum number to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Record an expense
    Add {
        /// Amount (must not be negative)
        amount: f64,

        /// Category: Food, Transport, Shopping, Bills, Entertainment, Healthcare, Education, Other
        category: String,

        /// Optional description
        #[arg(short, long)]
        description: Option<String>,

        /// Date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,
    },

    /// Change fields of an expense
    Update {
        /// Expense ID
        id: i64,

        #[arg(long)]
        amount: Option<f64>,

        #[arg(long)]
        category: Option<String>,

        #[arg(short, long)]
        description: Option<String>,

        /// Date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
    },

    /// Delete an expense
    Delete {
        /// Expense ID
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum InsightsAction {
    /// Predict next month's budget
    Prediction,
    /// Analyze spending patterns
    Patterns,
    /// Find unusual expenses
    Anomalies,
}

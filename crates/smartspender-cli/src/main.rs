//! SmartSpender CLI - Expense tracker with AI-assisted insights
//!
//! Usage:
//!   smartspender init                       Initialize database
//!   smartspender serve --port 5000          Start API server
//!   smartspender login --email E --password P
//!   smartspender expenses add 12.50 Food    Record an expense
//!   smartspender insights anomalies         Find unusual expenses

mod cli;
mod client;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use smartspender_core::insights::InsightKind;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    run(cli).await
}

/// Dispatch a parsed command line
pub(crate) async fn run(cli: Cli) -> Result<()> {
    // Only client commands need the session file
    let session_override = cli.session.clone();
    let session_path = || commands::session_path(session_override.as_deref());

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db),
        Commands::Serve { port, host } => commands::cmd_serve(&cli.db, &host, port).await,
        Commands::User { action } => {
            let db = commands::open_db(&cli.db)?;
            match action {
                UserAction::Add {
                    email,
                    name,
                    password,
                } => commands::cmd_user_add(&db, &email, &name, &password).map(|_| ()),
            }
        }
        Commands::Login {
            email,
            password,
            server,
        } => commands::cmd_login(&session_path()?, &server, &email, &password)
            .await
            .map(|_| ()),
        Commands::Logout => commands::cmd_logout(&session_path()?),
        Commands::Whoami => commands::cmd_whoami(&session_path()?).await,
        Commands::Expenses { action } => {
            let client = commands::require_client(&session_path()?)?;
            match action {
                None => commands::cmd_expenses_list(&client, 20).await,
                Some(ExpensesAction::List { limit }) => {
                    commands::cmd_expenses_list(&client, limit).await
                }
                Some(ExpensesAction::Add {
                    amount,
                    category,
                    description,
                    date,
                }) => commands::cmd_expenses_add(
                    &client,
                    amount,
                    &category,
                    description.as_deref(),
                    date.as_deref(),
                )
                .await
                .map(|_| ()),
                Some(ExpensesAction::Update {
                    id,
                    amount,
                    category,
                    description,
                    date,
                }) => commands::cmd_expenses_update(
                    &client,
                    id,
                    amount,
                    category.as_deref(),
                    description.as_deref(),
                    date.as_deref(),
                )
                .await
                .map(|_| ()),
                Some(ExpensesAction::Delete { id }) => {
                    commands::cmd_expenses_delete(&client, id).await
                }
            }
        }
        Commands::Stats => {
            let client = commands::require_client(&session_path()?)?;
            commands::cmd_stats(&client).await
        }
        Commands::Insights { action } => {
            let client = commands::require_client(&session_path()?)?;
            let kind = match action {
                InsightsAction::Prediction => InsightKind::BudgetPrediction,
                InsightsAction::Patterns => InsightKind::SpendingPatterns,
                InsightsAction::Anomalies => InsightKind::Anomalies,
            };
            commands::cmd_insights(&client, kind).await.map(|_| ())
        }
        Commands::Export { output, from, to } => {
            let client = commands::require_client(&session_path()?)?;
            commands::cmd_export(&client, &output, from.as_deref(), to.as_deref())
                .await
                .map(|_| ())
        }
    }
}

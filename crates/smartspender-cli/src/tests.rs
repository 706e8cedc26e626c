//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use std::path::Path;

use chrono::NaiveDate;
use smartspender_core::ai::InsightClient;
use smartspender_core::analytics;
use smartspender_core::db::Database;
use smartspender_core::insights::InsightKind;
use smartspender_core::models::{Category, SortOrder};
use smartspender_server::{create_router_with_ai, ServerConfig};
use tempfile::TempDir;

use crate::client::{ApiClient, InsightReply, Session};
use crate::commands::{self, truncate};

/// Serve the API for `db` on an ephemeral port and return its base URL
async fn spawn_server(db: Database, ai: Option<InsightClient>) -> String {
    let app = create_router_with_ai(db, ServerConfig::new("cli-test-secret"), ai);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Create a user, serve the API and log in, returning (db, session path, tempdir)
async fn logged_in(ai: Option<InsightClient>) -> (Database, std::path::PathBuf, TempDir) {
    let dir = TempDir::new().unwrap();
    let db = Database::in_memory().unwrap();
    commands::cmd_user_add(&db, "pat@example.com", "Pat", "secret123").unwrap();

    let url = spawn_server(db.clone(), ai).await;
    let session_path = dir.path().join("session.toml");
    commands::cmd_login(&session_path, &url, "pat@example.com", "secret123")
        .await
        .unwrap();

    (db, session_path, dir)
}

// ========== Helpers ==========

#[test]
fn test_truncate() {
    assert_eq!(truncate("short", 10), "short");
    assert_eq!(truncate("a long description here", 10), "a long ...");
    assert_eq!(truncate("café au lait", 7), "café...");
}

#[test]
fn test_parse_date_arg() {
    assert_eq!(
        commands::parse_date_arg("2024-02-29").unwrap(),
        NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
    );
    assert!(commands::parse_date_arg("2023-02-29").is_err());
    assert!(commands::parse_date_arg("02/01/2024").is_err());
}

#[test]
fn test_session_path_prefers_explicit() {
    let explicit = Path::new("/tmp/custom-session.toml");
    assert_eq!(commands::session_path(Some(explicit)).unwrap(), explicit);
}

// ========== Local Database Commands ==========

#[test]
fn test_cmd_init_creates_database() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("smartspender.db");

    commands::cmd_init(&db_path).unwrap();
    assert!(db_path.exists());
}

#[test]
fn test_cmd_user_add() {
    let db = Database::in_memory().unwrap();
    let user = commands::cmd_user_add(&db, "ola@example.com", "Ola", "secret123").unwrap();
    assert_eq!(db.get_user(user.id).unwrap().unwrap().email, "ola@example.com");

    // Duplicate email
    assert!(commands::cmd_user_add(&db, "ola@example.com", "Ola", "secret123").is_err());
    // Weak password
    assert!(commands::cmd_user_add(&db, "new@example.com", "New", "123").is_err());
}

// ========== Dispatch ==========

fn parse(args: &[&str]) -> crate::cli::Cli {
    use clap::Parser;
    crate::cli::Cli::try_parse_from(args).unwrap()
}

#[tokio::test]
async fn test_local_commands_dispatch_without_session() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("local.db");
    let db_arg = db_path.to_str().unwrap();

    crate::run(parse(&["smartspender", "--db", db_arg, "init"]))
        .await
        .unwrap();
    crate::run(parse(&[
        "smartspender", "--db", db_arg, "user", "add",
        "--email", "local@example.com", "--name", "Local", "--password", "secret123",
    ]))
    .await
    .unwrap();

    let db = Database::new(db_arg).unwrap();
    assert!(db.get_user_by_email("local@example.com").unwrap().is_some());
}

#[tokio::test]
async fn test_client_command_dispatch_requires_login() {
    let dir = TempDir::new().unwrap();
    let session = dir.path().join("session.toml");

    let err = crate::run(parse(&[
        "smartspender", "--session", session.to_str().unwrap(), "stats",
    ]))
    .await
    .unwrap_err();
    assert!(err.to_string().contains("Not logged in"));
}

// ========== Session ==========

#[test]
fn test_session_save_load_clear() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("session.toml");

    assert!(Session::load(&path).unwrap().is_none());

    let db = Database::in_memory().unwrap();
    let user = db.create_user("sam@example.com", "Sam", "hash").unwrap();
    let session = Session {
        base_url: "http://localhost:5000".to_string(),
        token: "abc.def.ghi".to_string(),
        user,
    };
    session.save(&path).unwrap();

    let loaded = Session::load(&path).unwrap().unwrap();
    assert_eq!(loaded, session);

    assert!(Session::clear(&path).unwrap());
    assert!(!Session::clear(&path).unwrap());
    assert!(Session::load(&path).unwrap().is_none());
}

#[test]
fn test_require_client_without_session() {
    let dir = TempDir::new().unwrap();
    let err = commands::require_client(&dir.path().join("missing.toml"))
        .err()
        .unwrap();
    assert!(err.to_string().contains("Not logged in"));
}

// ========== Formatting ==========

#[test]
fn test_format_stats() {
    let db = Database::in_memory().unwrap();
    let user = db.create_user("fmt@example.com", "Fmt", "hash").unwrap();
    let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
    db.insert_expense(
        user.id,
        &smartspender_core::models::NewExpense::new(12.5, Category::Food, date),
    )
    .unwrap();

    let expenses = db.list_expenses(user.id, SortOrder::Ascending).unwrap();
    let lines = commands::insights::format_stats(&analytics::compute_stats(&expenses));

    assert!(lines.iter().any(|l| l.contains("Total:    12.50")));
    assert!(lines.iter().any(|l| l.contains("Food") && l.contains("12.50")));
    assert!(lines.iter().any(|l| l.contains("2024-01")));
}

#[test]
fn test_format_fallback_prediction() {
    let fallback = serde_json::json!({
        "predictedMonthlyBudget": 123.456,
        "confidence": 0.7,
        "method": "simple_average"
    });
    let lines = commands::insights::format_fallback(InsightKind::BudgetPrediction, &fallback);
    assert_eq!(lines[0], "   Predicted monthly budget: 123.46");
    assert_eq!(lines[1], "   Confidence: 70%");
}

// ========== End-to-end against a live API ==========

#[tokio::test]
async fn test_login_whoami_logout() {
    let (_db, session_path, _dir) = logged_in(Some(InsightClient::mock())).await;

    let session = Session::load(&session_path).unwrap().unwrap();
    assert_eq!(session.user.email, "pat@example.com");
    assert!(!session.token.is_empty());

    commands::cmd_whoami(&session_path).await.unwrap();

    commands::cmd_logout(&session_path).unwrap();
    assert!(!session_path.exists());
    assert!(commands::cmd_whoami(&session_path).await.is_err());
}

#[tokio::test]
async fn test_login_bad_password_saves_nothing() {
    let dir = TempDir::new().unwrap();
    let db = Database::in_memory().unwrap();
    commands::cmd_user_add(&db, "pat@example.com", "Pat", "secret123").unwrap();
    let url = spawn_server(db, None).await;

    let session_path = dir.path().join("session.toml");
    let result = commands::cmd_login(&session_path, &url, "pat@example.com", "nope-nope").await;
    assert!(result.is_err());
    assert!(!session_path.exists());
}

#[tokio::test]
async fn test_expense_commands() {
    let (db, session_path, _dir) = logged_in(Some(InsightClient::mock())).await;
    let client = commands::require_client(&session_path).unwrap();

    let added = commands::cmd_expenses_add(&client, 42.0, "food", Some("Groceries"), Some("2024-05-01"))
        .await
        .unwrap();
    assert_eq!(added.category, Category::Food);
    assert_eq!(added.description, "Groceries");

    let updated = commands::cmd_expenses_update(&client, added.id, Some(40.0), Some("Shopping"), None, None)
        .await
        .unwrap();
    assert_eq!(updated.amount, 40.0);
    assert_eq!(updated.category, Category::Shopping);

    commands::cmd_expenses_list(&client, 5).await.unwrap();
    commands::cmd_stats(&client).await.unwrap();

    commands::cmd_expenses_delete(&client, added.id).await.unwrap();
    let remaining = db
        .list_expenses(session_user_id(&session_path), SortOrder::Descending)
        .unwrap();
    assert!(remaining.is_empty());

    // Rejected locally before any request
    assert!(commands::cmd_expenses_add(&client, 1.0, "Groceries", None, None).await.is_err());
    assert!(commands::cmd_expenses_update(&client, added.id, None, None, None, None).await.is_err());
    // Rejected by the server
    assert!(commands::cmd_expenses_delete(&client, added.id).await.is_err());
}

fn session_user_id(session_path: &Path) -> i64 {
    Session::load(session_path).unwrap().unwrap().user.id
}

#[tokio::test]
async fn test_insight_commands_with_fallback() {
    let (_db, session_path, _dir) = logged_in(Some(InsightClient::unavailable())).await;
    let client = commands::require_client(&session_path).unwrap();

    let reply = commands::cmd_insights(&client, InsightKind::BudgetPrediction)
        .await
        .unwrap();
    assert!(matches!(reply, InsightReply::NotEnoughData(_)));

    for (i, amount) in [10.0, 12.0, 11.0, 9.0, 200.0, 10.0, 12.0, 11.0, 9.0, 10.0]
        .iter()
        .enumerate()
    {
        let date = format!("2024-01-{:02}", i + 1);
        commands::cmd_expenses_add(&client, *amount, "Food", None, Some(&date))
            .await
            .unwrap();
    }

    match commands::cmd_insights(&client, InsightKind::Anomalies).await.unwrap() {
        InsightReply::Fallback(fallback) => {
            assert_eq!(fallback["anomalies"][0]["index"], 4);
        }
        other => panic!("expected fallback, got {:?}", other),
    }

    let reply = commands::cmd_insights(&client, InsightKind::SpendingPatterns)
        .await
        .unwrap();
    assert!(matches!(reply, InsightReply::Fallback(_)));
}

#[tokio::test]
async fn test_insight_commands_with_remote_service() {
    let (_db, session_path, _dir) = logged_in(Some(InsightClient::mock())).await;
    let client = commands::require_client(&session_path).unwrap();

    for day in 1..=3 {
        let date = format!("2024-03-{:02}", day);
        commands::cmd_expenses_add(&client, 10.0, "Bills", None, Some(&date))
            .await
            .unwrap();
    }

    match commands::cmd_insights(&client, InsightKind::BudgetPrediction).await.unwrap() {
        InsightReply::Remote(payload) => {
            assert_eq!(payload["prediction"]["method"], "mock");
        }
        other => panic!("expected remote payload, got {:?}", other),
    }
}

#[tokio::test]
async fn test_export_command() {
    let (_db, session_path, dir) = logged_in(None).await;
    let client = commands::require_client(&session_path).unwrap();

    commands::cmd_expenses_add(&client, 5.0, "Transport", Some("Bus, downtown"), Some("2024-01-10"))
        .await
        .unwrap();
    commands::cmd_expenses_add(&client, 8.0, "Food", None, Some("2024-02-10"))
        .await
        .unwrap();

    let output = dir.path().join("expenses.csv");
    let written = commands::cmd_export(&client, &output, Some("2024-01-01"), None)
        .await
        .unwrap();
    assert_eq!(written, 2);

    let csv = std::fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "date,category,amount,description");
    assert_eq!(lines[1], "2024-02-10,Food,8.00,");
    assert_eq!(lines[2], "2024-01-10,Transport,5.00,\"Bus, downtown\"");

    let written = commands::cmd_export(&client, &output, Some("2024-02-01"), Some("2024-02-28"))
        .await
        .unwrap();
    assert_eq!(written, 1);
}

#[tokio::test]
async fn test_api_client_reports_server_errors() {
    let (_db, session_path, _dir) = logged_in(None).await;
    let client = ApiClient::from_session(&Session::load(&session_path).unwrap().unwrap());

    let err = client
        .update_expense(9999, &smartspender_core::models::ExpenseUpdate {
            amount: Some(1.0),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Expense not found"));
}

//! Insight orchestration
//!
//! Ties the remote AI service to the local analytics: each insight first
//! checks there is enough history, then asks the service, and on
//! `RemoteResult::Unavailable` substitutes the matching local computation.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use smartspender_core::insights::{run_anomaly_detection, InsightOutcome};
//!
//! let expenses = db.list_expenses(user_id, SortOrder::Ascending)?;
//! match run_anomaly_detection(ai.as_ref(), &expenses).await {
//!     InsightOutcome::Remote(payload) => { /* service answer */ }
//!     InsightOutcome::Fallback { reason, fallback } => { /* local answer */ }
//!     InsightOutcome::NotEnoughData { required, found } => { /* ask for more */ }
//! }
//! ```

use serde_json::Value;
use tracing::{info, warn};

use crate::ai::{InsightBackend, RemoteResult};
use crate::analytics::{self, AnomalyResult, PatternResult, Prediction};
use crate::models::Expense;

/// The three AI-backed insights
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsightKind {
    BudgetPrediction,
    SpendingPatterns,
    Anomalies,
}

impl InsightKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BudgetPrediction => "budget_prediction",
            Self::SpendingPatterns => "spending_patterns",
            Self::Anomalies => "anomalies",
        }
    }

    /// Minimum number of expenses before the insight is attempted
    pub fn min_expenses(&self) -> usize {
        match self {
            Self::BudgetPrediction => 3,
            Self::SpendingPatterns => 5,
            Self::Anomalies => 5,
        }
    }

    /// User-facing explanation when there is too little history
    pub fn not_enough_data_message(&self) -> &'static str {
        match self {
            Self::BudgetPrediction => "Need at least 3 expenses for prediction",
            Self::SpendingPatterns => "Need at least 5 expenses for pattern analysis",
            Self::Anomalies => "Need at least 5 expenses for anomaly detection",
        }
    }
}

impl std::fmt::Display for InsightKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of running one insight
#[derive(Debug, Clone, PartialEq)]
pub enum InsightOutcome<T> {
    /// Too few expenses; neither the service nor the fallback ran
    NotEnoughData { required: usize, found: usize },
    /// The AI service answered; its payload is passed through untouched
    Remote(Value),
    /// The AI service was unavailable; `fallback` was computed locally
    Fallback { reason: String, fallback: T },
}

impl<T> InsightOutcome<T> {
    pub fn is_fallback(&self) -> bool {
        matches!(self, InsightOutcome::Fallback { .. })
    }
}

/// Predict next month's budget (needs 3 expenses sorted by date ascending)
pub async fn run_budget_prediction<B: InsightBackend + ?Sized>(
    backend: Option<&B>,
    expenses: &[Expense],
) -> InsightOutcome<Prediction> {
    run(
        InsightKind::BudgetPrediction,
        backend,
        expenses,
        analytics::predict_budget,
    )
    .await
}

/// Analyze spending patterns (needs 5 expenses)
pub async fn run_spending_patterns<B: InsightBackend + ?Sized>(
    backend: Option<&B>,
    expenses: &[Expense],
) -> InsightOutcome<PatternResult> {
    run(
        InsightKind::SpendingPatterns,
        backend,
        expenses,
        analytics::group_patterns,
    )
    .await
}

/// Detect unusual expenses (needs 5 expenses)
pub async fn run_anomaly_detection<B: InsightBackend + ?Sized>(
    backend: Option<&B>,
    expenses: &[Expense],
) -> InsightOutcome<AnomalyResult> {
    run(
        InsightKind::Anomalies,
        backend,
        expenses,
        analytics::detect_anomalies,
    )
    .await
}

async fn run<T, B: InsightBackend + ?Sized>(
    kind: InsightKind,
    backend: Option<&B>,
    expenses: &[Expense],
    fallback: fn(&[Expense]) -> T,
) -> InsightOutcome<T> {
    let required = kind.min_expenses();
    if expenses.len() < required {
        return InsightOutcome::NotEnoughData {
            required,
            found: expenses.len(),
        };
    }

    let remote = match backend {
        Some(b) => call_remote(kind, b, expenses).await,
        None => RemoteResult::Unavailable("AI service not configured".to_string()),
    };

    match remote {
        RemoteResult::Success(payload) => {
            info!(insight = %kind, count = expenses.len(), "AI service answered");
            InsightOutcome::Remote(payload)
        }
        RemoteResult::Unavailable(reason) => {
            warn!(insight = %kind, %reason, "AI service unavailable, using local fallback");
            InsightOutcome::Fallback {
                reason,
                fallback: fallback(expenses),
            }
        }
    }
}

async fn call_remote<B: InsightBackend + ?Sized>(
    kind: InsightKind,
    backend: &B,
    expenses: &[Expense],
) -> RemoteResult<Value> {
    match kind {
        InsightKind::BudgetPrediction => backend.predict_budget(expenses).await,
        InsightKind::SpendingPatterns => backend.analyze_patterns(expenses).await,
        InsightKind::Anomalies => backend.detect_anomalies(expenses).await,
    }
}

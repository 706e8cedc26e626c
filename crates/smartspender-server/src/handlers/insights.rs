//! AI insight handlers
//!
//! Each endpoint answers with the AI service's payload when it is reachable.
//! When it is not, the response is 503 carrying the locally computed result
//! under `fallback`. Too little history short-circuits both.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};

use crate::{auth_user, AppError, AppState};
use smartspender_core::insights::{self, InsightKind, InsightOutcome};
use smartspender_core::models::{Expense, SortOrder};

/// Body returned below the minimum record count
fn not_enough_data_body(kind: InsightKind) -> Value {
    let message = kind.not_enough_data_message();
    match kind {
        InsightKind::BudgetPrediction => json!({ "prediction": null, "message": message }),
        InsightKind::SpendingPatterns => json!({ "patterns": null, "message": message }),
        InsightKind::Anomalies => json!({ "anomalies": [], "message": message }),
    }
}

fn outcome_response<T: Serialize>(kind: InsightKind, outcome: InsightOutcome<T>) -> Response {
    match outcome {
        InsightOutcome::NotEnoughData { .. } => Json(not_enough_data_body(kind)).into_response(),
        InsightOutcome::Remote(payload) => Json(payload).into_response(),
        InsightOutcome::Fallback { fallback, .. } => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "message": "AI service unavailable",
                "fallback": fallback
            })),
        )
            .into_response(),
    }
}

/// Analytics expect oldest first
fn history(state: &AppState, request: &Request) -> Result<Vec<Expense>, AppError> {
    let user = auth_user(request)?;
    Ok(state.db.list_expenses(user.0.id, SortOrder::Ascending)?)
}

/// GET /api/insights/budget-prediction
pub async fn budget_prediction(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Response, AppError> {
    let expenses = history(&state, &request)?;
    let outcome = insights::run_budget_prediction(state.ai.as_ref(), &expenses).await;
    Ok(outcome_response(InsightKind::BudgetPrediction, outcome))
}

/// GET /api/insights/spending-patterns
pub async fn spending_patterns(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Response, AppError> {
    let expenses = history(&state, &request)?;
    let outcome = insights::run_spending_patterns(state.ai.as_ref(), &expenses).await;
    Ok(outcome_response(InsightKind::SpendingPatterns, outcome))
}

/// GET /api/insights/anomalies
pub async fn anomalies(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Response, AppError> {
    let expenses = history(&state, &request)?;
    let outcome = insights::run_anomaly_detection(state.ai.as_ref(), &expenses).await;
    Ok(outcome_response(InsightKind::Anomalies, outcome))
}

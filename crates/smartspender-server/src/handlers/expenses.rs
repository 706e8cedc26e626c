//! Expense management handlers
//!
//! All handlers operate on the authenticated user's records only; another
//! user's expense id is reported as not found.

use std::sync::Arc;

use axum::{
    extract::{Path, Request, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

use super::read_json;
use crate::{auth_user, AppError, AppState};
use smartspender_core::analytics::{self, Stats};
use smartspender_core::models::{Category, Expense, ExpenseUpdate, NewExpense, SortOrder};

/// An amount as sent by clients: a JSON number or a numeric string
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    Number(f64),
    Text(String),
}

impl AmountInput {
    fn parse(&self) -> Result<f64, AppError> {
        let invalid = || AppError::bad_request("Amount must be a positive number");
        match self {
            Self::Number(amount) => Ok(*amount),
            Self::Text(text) => text.trim().parse::<f64>().map_err(|_| invalid()),
        }
    }
}

/// Request body for creating an expense
///
/// Category and date arrive as strings so that bad values get a specific
/// message instead of a generic JSON error.
#[derive(Debug, Deserialize)]
pub struct CreateExpenseRequest {
    pub amount: AmountInput,
    pub category: String,
    pub description: Option<String>,
    pub date: Option<String>,
}

/// Request body for updating an expense
#[derive(Debug, Deserialize)]
pub struct UpdateExpenseRequest {
    pub amount: Option<AmountInput>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
}

/// Response for delete
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

fn parse_category(s: &str) -> Result<Category, AppError> {
    s.parse().map_err(|_| AppError::bad_request("Invalid category"))
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp
fn parse_date(s: &str) -> Result<NaiveDate, AppError> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(s).map(|dt| dt.date_naive()))
        .map_err(|_| AppError::bad_request("Invalid date format"))
}

/// GET /api/expenses - List the caller's expenses, newest first
pub async fn list_expenses(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<Vec<Expense>>, AppError> {
    let user = auth_user(&request)?;
    let expenses = state.db.list_expenses(user.0.id, SortOrder::Descending)?;
    Ok(Json(expenses))
}

/// POST /api/expenses - Record a new expense
pub async fn create_expense(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<(StatusCode, Json<Expense>), AppError> {
    let user = auth_user(&request)?;
    let req: CreateExpenseRequest = read_json(request).await?;

    let new = NewExpense {
        amount: req.amount.parse()?,
        category: parse_category(&req.category)?,
        description: req.description,
        date: req.date.as_deref().map(parse_date).transpose()?,
    };

    let expense = state
        .db
        .insert_expense(user.0.id, &new)
        .map_err(AppError::from_core)?;

    Ok((StatusCode::CREATED, Json(expense)))
}

/// PUT /api/expenses/:id - Partially update an expense
pub async fn update_expense(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<Expense>, AppError> {
    let user = auth_user(&request)?;
    let req: UpdateExpenseRequest = read_json(request).await?;

    let update = ExpenseUpdate {
        amount: req.amount.as_ref().map(AmountInput::parse).transpose()?,
        category: req.category.as_deref().map(parse_category).transpose()?,
        description: req.description,
        date: req.date.as_deref().map(parse_date).transpose()?,
    };

    let expense = state
        .db
        .update_expense(user.0.id, id, &update)
        .map_err(AppError::from_core)?
        .ok_or_else(|| AppError::not_found("Expense not found"))?;

    Ok(Json(expense))
}

/// DELETE /api/expenses/:id - Delete an expense
pub async fn delete_expense(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<MessageResponse>, AppError> {
    let user = auth_user(&request)?;

    if !state.db.delete_expense(user.0.id, id)? {
        return Err(AppError::not_found("Expense not found"));
    }

    Ok(Json(MessageResponse {
        message: "Expense deleted successfully".to_string(),
    }))
}

/// GET /api/expenses/stats - Totals by category and month
pub async fn get_stats(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<Stats>, AppError> {
    let user = auth_user(&request)?;
    let expenses = state.db.list_expenses(user.0.id, SortOrder::Ascending)?;
    Ok(Json(analytics::compute_stats(&expenses)))
}

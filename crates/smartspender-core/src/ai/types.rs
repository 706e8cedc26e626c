//! Wire types shared by all insight backends

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::{Category, Expense};

/// Outcome of a call to the remote AI service
///
/// Remote failures never surface as errors: anything that prevents a usable
/// payload (connection refused, timeout, non-2xx status, unparsable body)
/// becomes `Unavailable` with a human-readable reason, and the caller picks
/// the local fallback by matching on it.
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteResult<T> {
    Success(T),
    Unavailable(String),
}

impl<T> RemoteResult<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, RemoteResult::Success(_))
    }
}

/// One expense as sent to the AI service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpensePayload {
    pub amount: f64,
    pub category: Category,
    pub date: NaiveDate,
    /// 1-12
    pub month: u32,
    pub year: i32,
}

impl From<&Expense> for ExpensePayload {
    fn from(expense: &Expense) -> Self {
        Self {
            amount: expense.amount,
            category: expense.category,
            date: expense.date,
            month: expense.date.month(),
            year: expense.date.year(),
        }
    }
}

/// Request body for every AI service endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightRequest {
    pub expenses: Vec<ExpensePayload>,
}

impl InsightRequest {
    pub fn from_expenses(expenses: &[Expense]) -> Self {
        Self {
            expenses: expenses.iter().map(ExpensePayload::from).collect(),
        }
    }
}

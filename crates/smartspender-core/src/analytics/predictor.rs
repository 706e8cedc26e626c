//! Simple monthly budget prediction

use serde::{Deserialize, Serialize};

use super::AnalysisMethod;
use crate::models::Expense;

/// Fixed confidence reported for the simple average
pub const SIMPLE_AVERAGE_CONFIDENCE: f64 = 0.7;

/// Days per month used when converting the history span
const DAYS_PER_MONTH: f64 = 30.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    pub predicted_monthly_budget: f64,
    /// In [0, 1]
    pub confidence: f64,
    pub method: AnalysisMethod,
}

/// Estimate a monthly budget as total spend divided by the history span
///
/// Expects expenses sorted by date ascending: the span is measured from the
/// first to the last element. Callers require at least three records before
/// calling. The span is floored at one month, so a single day of history (or
/// an empty slice) never divides by zero.
pub fn predict_budget(expenses: &[Expense]) -> Prediction {
    let total: f64 = expenses.iter().map(|e| e.amount).sum();

    let span_days = match (expenses.first(), expenses.last()) {
        (Some(first), Some(last)) => (last.date - first.date).num_days() as f64,
        _ => 0.0,
    };
    let span_months = (span_days / DAYS_PER_MONTH).max(1.0);

    Prediction {
        predicted_monthly_budget: total / span_months,
        confidence: SIMPLE_AVERAGE_CONFIDENCE,
        method: AnalysisMethod::SimpleAverage,
    }
}

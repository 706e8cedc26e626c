//! Expense statistics: totals by category and by calendar month

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::{Category, Expense};

/// Aggregate spending for one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total: f64,
    /// Only categories with at least one expense appear
    pub by_category: BTreeMap<Category, f64>,
    /// Keyed by zero-padded "YYYY-MM"
    pub by_month: BTreeMap<String, f64>,
    pub count: usize,
}

/// Compute total, per-category and per-month spending
///
/// An empty slice yields zero totals and empty maps.
pub fn compute_stats(expenses: &[Expense]) -> Stats {
    let mut total = 0.0;
    let mut by_category: BTreeMap<Category, f64> = BTreeMap::new();
    let mut by_month: BTreeMap<String, f64> = BTreeMap::new();

    for expense in expenses {
        total += expense.amount;
        *by_category.entry(expense.category).or_insert(0.0) += expense.amount;
        *by_month
            .entry(expense.date.format("%Y-%m").to_string())
            .or_insert(0.0) += expense.amount;
    }

    Stats {
        total,
        by_category,
        by_month,
        count: expenses.len(),
    }
}

//! Per-category spending groups
//!
//! Stand-in for the remote service's clustering: one "cluster" per category
//! present, rather than a learned grouping.

use serde::{Deserialize, Serialize};

use super::AnalysisMethod;
use crate::models::{Category, Expense};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCluster {
    pub category: Category,
    pub total_amount: f64,
    pub average_amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternResult {
    pub clusters: Vec<CategoryCluster>,
    pub method: AnalysisMethod,
}

/// Group expenses by category, in order of each category's first appearance
pub fn group_patterns(expenses: &[Expense]) -> PatternResult {
    // (category, total, count); at most one entry per category
    let mut groups: Vec<(Category, f64, usize)> = Vec::new();

    for expense in expenses {
        match groups.iter_mut().find(|(c, _, _)| *c == expense.category) {
            Some((_, total, count)) => {
                *total += expense.amount;
                *count += 1;
            }
            None => groups.push((expense.category, expense.amount, 1)),
        }
    }

    let clusters = groups
        .into_iter()
        .map(|(category, total, count)| CategoryCluster {
            category,
            total_amount: total,
            average_amount: total / count as f64,
        })
        .collect();

    PatternResult {
        clusters,
        method: AnalysisMethod::SimpleGrouping,
    }
}

//! Statistical anomaly detection
//!
//! Flags expenses whose amount exceeds the mean by more than two population
//! standard deviations. Unlike z-score detectors that look both ways, only
//! unusually large amounts matter here.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{numeric, AnalysisMethod};
use crate::models::{Category, Expense};

/// Number of standard deviations above the mean that counts as unusual
const STD_DEV_MULTIPLIER: f64 = 2.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anomaly {
    /// Position of the expense in the analyzed slice
    pub index: usize,
    pub amount: f64,
    pub category: Category,
    pub date: NaiveDate,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyResult {
    pub anomalies: Vec<Anomaly>,
    pub method: AnalysisMethod,
}

/// Flag every expense with `amount > mean + 2σ`, in input order
///
/// Indices refer to positions in `expenses`. When all amounts are equal the
/// threshold equals the mean and nothing is flagged.
pub fn detect_anomalies(expenses: &[Expense]) -> AnomalyResult {
    let amounts: Vec<f64> = expenses.iter().map(|e| e.amount).collect();
    let threshold = numeric::mean(&amounts) + STD_DEV_MULTIPLIER * numeric::std_dev(&amounts);

    let anomalies = expenses
        .iter()
        .enumerate()
        .filter(|(_, e)| e.amount > threshold)
        .map(|(index, e)| Anomaly {
            index,
            amount: e.amount,
            category: e.category,
            date: e.date,
            reason: format!("Amount exceeds mean + 2σ ({:.2})", threshold),
        })
        .collect();

    AnomalyResult {
        anomalies,
        method: AnalysisMethod::StatisticalThreshold,
    }
}

//! Local expense analytics
//!
//! Pure, synchronous computations over one user's expenses. They never touch
//! storage or the network, so they double as fallbacks when the remote AI
//! service cannot be reached.
//!
//! - **Aggregator** - totals by category and month
//! - **Simple Predictor** - naive monthly budget from the history span
//! - **Pattern Grouper** - per-category totals and averages
//! - **Anomaly Detector** - amounts above mean + 2σ
//!
//! ## Usage
//!
//! ```rust,ignore
//! use smartspender_core::analytics;
//!
//! let expenses = db.list_expenses(user_id, SortOrder::Ascending)?;
//! let stats = analytics::compute_stats(&expenses);
//! let anomalies = analytics::detect_anomalies(&expenses);
//! ```

pub mod aggregator;
pub mod anomalies;
pub mod numeric;
pub mod patterns;
pub mod predictor;

use serde::{Deserialize, Serialize};

pub use aggregator::{compute_stats, Stats};
pub use anomalies::{detect_anomalies, Anomaly, AnomalyResult};
pub use patterns::{group_patterns, CategoryCluster, PatternResult};
pub use predictor::{predict_budget, Prediction};

/// Tag identifying which local method produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisMethod {
    SimpleAverage,
    SimpleGrouping,
    StatisticalThreshold,
}

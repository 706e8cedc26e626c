//! SmartSpender Core Library
//!
//! Shared functionality for the SmartSpender expense tracker:
//! - Database access and migrations (users, expenses)
//! - Local analytics: aggregation, budget prediction, grouping, anomalies
//! - Remote AI service client with unavailable-aware results
//! - Insight orchestration with local fallbacks
//! - Password hashing and credential checks
//! - CSV export

pub mod ai;
pub mod analytics;
pub mod auth;
pub mod db;
pub mod error;
pub mod export;
pub mod insights;
pub mod models;

/// Test utilities including mock AI service
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use ai::{
    HttpBackend, InsightBackend, InsightClient, InsightEndpoint, InsightRequest, MockBackend,
    RemoteResult,
};
pub use analytics::{
    AnalysisMethod, Anomaly, AnomalyResult, CategoryCluster, PatternResult, Prediction, Stats,
};
pub use db::Database;
pub use error::{Error, Result};
pub use export::ExpenseExportOptions;
pub use insights::{InsightKind, InsightOutcome};
pub use models::*;

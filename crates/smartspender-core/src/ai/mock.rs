//! Mock backend for testing
//!
//! Returns canned payloads shaped like the real service's responses, or
//! reports itself unavailable. Useful for unit tests and development without
//! a running AI service.

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::models::Expense;

use super::types::RemoteResult;
use super::InsightBackend;

/// Mock insight backend
#[derive(Clone, Default)]
pub struct MockBackend {
    /// Whether calls succeed; when false every call is `Unavailable`
    pub healthy: bool,
}

impl MockBackend {
    /// Create a new mock backend (healthy by default)
    pub fn new() -> Self {
        Self { healthy: true }
    }

    /// Create a mock backend that is never reachable
    pub fn unavailable() -> Self {
        Self { healthy: false }
    }

    fn respond(&self, payload: impl FnOnce() -> Value) -> RemoteResult<Value> {
        if self.healthy {
            RemoteResult::Success(payload())
        } else {
            RemoteResult::Unavailable("mock AI service is unavailable".to_string())
        }
    }
}

#[async_trait]
impl InsightBackend for MockBackend {
    async fn predict_budget(&self, expenses: &[Expense]) -> RemoteResult<Value> {
        let total: f64 = expenses.iter().map(|e| e.amount).sum();
        self.respond(|| {
            json!({
                "prediction": {
                    "predictedMonthlyBudget": total,
                    "confidence": 0.9,
                    "method": "mock"
                }
            })
        })
    }

    async fn analyze_patterns(&self, expenses: &[Expense]) -> RemoteResult<Value> {
        let count = expenses.len();
        self.respond(|| {
            json!({
                "clusters": [],
                "pattern_analysis": [],
                "count": count,
                "method": "mock"
            })
        })
    }

    async fn detect_anomalies(&self, _expenses: &[Expense]) -> RemoteResult<Value> {
        self.respond(|| {
            json!({
                "anomalies": [],
                "total_detected": 0,
                "method": "mock"
            })
        })
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }
}

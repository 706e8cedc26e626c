//! Remote AI service abstraction
//!
//! The AI service does the heavy lifting for budget prediction, spending
//! pattern clustering and anomaly detection. This module hides how it is
//! reached behind a small trait so callers only ever see a `RemoteResult`.
//!
//! # Architecture
//!
//! - `InsightBackend` trait: the three analysis calls plus a health check
//! - `InsightClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - Backend implementations: `HttpBackend`, `MockBackend`
//!
//! # Configuration
//!
//! Environment variables:
//! - `AI_BACKEND`: Backend to use (http, mock, none). Default: http
//! - `AI_SERVICE_URL`: Service base URL for the http backend
//! - `AI_SERVICE_TIMEOUT_SECS`: Request timeout for the http backend

mod http;
mod mock;
pub mod types;

pub use http::{HttpBackend, DEFAULT_AI_SERVICE_URL, DEFAULT_TIMEOUT_SECS};
pub use mock::MockBackend;
pub use types::*;

use async_trait::async_trait;
use serde_json::Value;

use crate::models::Expense;

/// The AI service's analysis endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsightEndpoint {
    PredictBudget,
    AnalyzePatterns,
    DetectAnomalies,
}

impl InsightEndpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Self::PredictBudget => "predict-budget",
            Self::AnalyzePatterns => "analyze-patterns",
            Self::DetectAnomalies => "detect-anomalies",
        }
    }
}

/// Trait implemented by every way of reaching the AI service
///
/// Implementations must not fail: problems reaching the service are reported
/// as `RemoteResult::Unavailable`.
#[async_trait]
pub trait InsightBackend: Send + Sync {
    /// Forecast next month's budget
    async fn predict_budget(&self, expenses: &[Expense]) -> RemoteResult<Value>;

    /// Cluster expenses into spending patterns
    async fn analyze_patterns(&self, expenses: &[Expense]) -> RemoteResult<Value>;

    /// Find unusual expenses
    async fn detect_anomalies(&self, expenses: &[Expense]) -> RemoteResult<Value>;

    /// Check if the service is reachable
    async fn health_check(&self) -> bool;

    /// Get the host URL (for logging)
    fn host(&self) -> &str;
}

/// Concrete insight client enum
#[derive(Clone)]
pub enum InsightClient {
    /// Remote AI service over HTTP
    Http(HttpBackend),
    /// Mock backend for testing
    Mock(MockBackend),
}

impl InsightClient {
    /// Create a client from environment variables
    ///
    /// Checks `AI_BACKEND`:
    /// - `http` (default): uses `AI_SERVICE_URL` / `AI_SERVICE_TIMEOUT_SECS`
    /// - `mock`: an always-healthy mock with canned payloads
    /// - `none` / `disabled`: no client, every insight uses the local fallback
    pub fn from_env() -> Option<Self> {
        let backend = std::env::var("AI_BACKEND").unwrap_or_else(|_| "http".to_string());

        match backend.to_lowercase().as_str() {
            "http" | "remote" => Some(InsightClient::Http(HttpBackend::from_env())),
            "mock" => Some(InsightClient::Mock(MockBackend::new())),
            "none" | "disabled" | "off" => None,
            _ => {
                tracing::warn!(backend = %backend, "Unknown AI_BACKEND, falling back to http");
                Some(InsightClient::Http(HttpBackend::from_env()))
            }
        }
    }

    /// Create an HTTP client for the given base URL
    pub fn http(base_url: &str) -> Self {
        InsightClient::Http(HttpBackend::new(base_url))
    }

    /// Create a healthy mock client
    pub fn mock() -> Self {
        InsightClient::Mock(MockBackend::new())
    }

    /// Create a mock client that is always unavailable
    pub fn unavailable() -> Self {
        InsightClient::Mock(MockBackend::unavailable())
    }
}

#[async_trait]
impl InsightBackend for InsightClient {
    async fn predict_budget(&self, expenses: &[Expense]) -> RemoteResult<Value> {
        match self {
            InsightClient::Http(b) => b.predict_budget(expenses).await,
            InsightClient::Mock(b) => b.predict_budget(expenses).await,
        }
    }

    async fn analyze_patterns(&self, expenses: &[Expense]) -> RemoteResult<Value> {
        match self {
            InsightClient::Http(b) => b.analyze_patterns(expenses).await,
            InsightClient::Mock(b) => b.analyze_patterns(expenses).await,
        }
    }

    async fn detect_anomalies(&self, expenses: &[Expense]) -> RemoteResult<Value> {
        match self {
            InsightClient::Http(b) => b.detect_anomalies(expenses).await,
            InsightClient::Mock(b) => b.detect_anomalies(expenses).await,
        }
    }

    async fn health_check(&self) -> bool {
        match self {
            InsightClient::Http(b) => b.health_check().await,
            InsightClient::Mock(b) => b.health_check().await,
        }
    }

    fn host(&self) -> &str {
        match self {
            InsightClient::Http(b) => b.host(),
            InsightClient::Mock(b) => b.host(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_paths() {
        assert_eq!(InsightEndpoint::PredictBudget.path(), "predict-budget");
        assert_eq!(InsightEndpoint::AnalyzePatterns.path(), "analyze-patterns");
        assert_eq!(InsightEndpoint::DetectAnomalies.path(), "detect-anomalies");
    }

    #[test]
    fn test_insight_client_mock() {
        let client = InsightClient::mock();
        assert_eq!(client.host(), "mock://localhost");
    }

    #[tokio::test]
    async fn test_mock_health_check() {
        assert!(InsightClient::mock().health_check().await);
        assert!(!InsightClient::unavailable().health_check().await);
    }

    #[tokio::test]
    async fn test_unavailable_client_reports_reason() {
        let client = InsightClient::unavailable();
        match client.predict_budget(&[]).await {
            RemoteResult::Unavailable(reason) => assert!(!reason.is_empty()),
            RemoteResult::Success(_) => panic!("expected Unavailable"),
        }
    }
}

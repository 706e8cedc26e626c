//! HTTP backend for the remote AI service
//!
//! # Configuration
//!
//! Environment variables:
//! - `AI_SERVICE_URL`: Service base URL (default: http://localhost:5001)
//! - `AI_SERVICE_TIMEOUT_SECS`: Per-request timeout (default: 10)

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use crate::models::Expense;

use super::types::{InsightRequest, RemoteResult};
use super::{InsightBackend, InsightEndpoint};

/// Default base URL of the AI service
pub const DEFAULT_AI_SERVICE_URL: &str = "http://localhost:5001";

/// Default request timeout before falling back to local analytics
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// reqwest-based client for the AI service's JSON endpoints
#[derive(Clone)]
pub struct HttpBackend {
    http_client: Client,
    base_url: String,
    timeout: Duration,
}

impl HttpBackend {
    pub fn new(base_url: &str) -> Self {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    /// Create from environment variables, falling back to the defaults
    pub fn from_env() -> Self {
        let base_url = std::env::var("AI_SERVICE_URL")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_AI_SERVICE_URL.to_string());
        let timeout_secs = std::env::var("AI_SERVICE_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Self::with_timeout(&base_url, Duration::from_secs(timeout_secs))
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn post(&self, endpoint: InsightEndpoint, expenses: &[Expense]) -> RemoteResult<Value> {
        let url = format!("{}/{}", self.base_url, endpoint.path());
        let body = InsightRequest::from_expenses(expenses);

        debug!(url = %url, count = body.expenses.len(), "Calling AI service");

        let response = match self
            .http_client
            .post(&url)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => {
                let reason = if e.is_timeout() {
                    format!("request timed out after {}s", self.timeout.as_secs())
                } else {
                    format!("request failed: {}", e)
                };
                warn!(url = %url, %reason, "AI service error");
                return RemoteResult::Unavailable(reason);
            }
        };

        let status = response.status();
        if !status.is_success() {
            let reason = format!("AI service returned {}", status);
            warn!(url = %url, %reason, "AI service error");
            return RemoteResult::Unavailable(reason);
        }

        match response.json::<Value>().await {
            Ok(payload) => RemoteResult::Success(payload),
            Err(e) => {
                let reason = format!("invalid response body: {}", e);
                warn!(url = %url, %reason, "AI service error");
                RemoteResult::Unavailable(reason)
            }
        }
    }
}

#[async_trait]
impl InsightBackend for HttpBackend {
    async fn predict_budget(&self, expenses: &[Expense]) -> RemoteResult<Value> {
        self.post(InsightEndpoint::PredictBudget, expenses).await
    }

    async fn analyze_patterns(&self, expenses: &[Expense]) -> RemoteResult<Value> {
        self.post(InsightEndpoint::AnalyzePatterns, expenses).await
    }

    async fn detect_anomalies(&self, expenses: &[Expense]) -> RemoteResult<Value> {
        self.post(InsightEndpoint::DetectAnomalies, expenses).await
    }

    async fn health_check(&self) -> bool {
        match self
            .http_client
            .get(format!("{}/health", self.base_url))
            .timeout(self.timeout)
            .send()
            .await
        {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    fn host(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use crate::test_utils::MockInsightServer;
    use chrono::{NaiveDate, Utc};

    fn expenses() -> Vec<Expense> {
        (1..=5)
            .map(|day| Expense {
                id: day,
                user_id: 1,
                amount: 10.0 * day as f64,
                category: Category::Food,
                description: String::new(),
                date: NaiveDate::from_ymd_opt(2024, 1, day as u32).unwrap(),
                created_at: Utc::now(),
            })
            .collect()
    }

    #[test]
    fn test_trims_trailing_slash() {
        let backend = HttpBackend::new("http://ai.local:5001/");
        assert_eq!(backend.host(), "http://ai.local:5001");
        assert_eq!(backend.timeout(), Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[tokio::test]
    async fn test_success_against_mock_service() {
        let server = MockInsightServer::start().await;
        let backend = HttpBackend::new(&server.url());

        assert!(backend.health_check().await);

        match backend.predict_budget(&expenses()).await {
            RemoteResult::Success(payload) => {
                assert_eq!(payload["prediction"]["method"], "linear_regression");
                // The mock echoes how many expenses it received
                assert_eq!(payload["prediction"]["received"], 5);
            }
            RemoteResult::Unavailable(reason) => panic!("unexpected fallback: {}", reason),
        }

        assert!(backend.analyze_patterns(&expenses()).await.is_success());
        assert!(backend.detect_anomalies(&expenses()).await.is_success());
    }

    #[tokio::test]
    async fn test_error_status_is_unavailable() {
        let server = MockInsightServer::start_failing().await;
        let backend = HttpBackend::new(&server.url());

        match backend.detect_anomalies(&expenses()).await {
            RemoteResult::Unavailable(reason) => assert!(reason.contains("500")),
            RemoteResult::Success(_) => panic!("expected Unavailable"),
        }
    }

    #[tokio::test]
    async fn test_unreachable_is_unavailable() {
        // Port 9 (discard) on localhost is essentially never listening
        let backend = HttpBackend::with_timeout("http://127.0.0.1:9", Duration::from_secs(2));

        assert!(!backend.health_check().await);
        assert!(!backend.predict_budget(&expenses()).await.is_success());
    }
}

//! Test utilities for smartspender-core
//!
//! This module provides a mock AI service that speaks the same JSON protocol
//! as the real one, for development and integration tests.

use axum::{
    extract::Json,
    http::StatusCode,
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use std::net::SocketAddr;
use tokio::sync::oneshot;

use crate::ai::InsightRequest;

/// Mock AI service for testing and development
pub struct MockInsightServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockInsightServer {
    /// Start a healthy mock service on an available port
    pub async fn start() -> Self {
        let app = Router::new()
            .route("/health", get(handle_health))
            .route("/predict-budget", post(handle_predict_budget))
            .route("/analyze-patterns", post(handle_analyze_patterns))
            .route("/detect-anomalies", post(handle_detect_anomalies));

        Self::serve(app).await
    }

    /// Start a mock service whose analysis endpoints all return 500
    pub async fn start_failing() -> Self {
        let app = Router::new()
            .route("/health", get(handle_health))
            .route("/predict-budget", post(handle_error))
            .route("/analyze-patterns", post(handle_error))
            .route("/detect-anomalies", post(handle_error));

        Self::serve(app).await
    }

    async fn serve(app: Router) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get the base URL for this mock service
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Stop the mock service
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockInsightServer {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn handle_health() -> Json<Value> {
    Json(json!({ "status": "OK", "message": "AI Service is running" }))
}

async fn handle_predict_budget(Json(request): Json<InsightRequest>) -> Json<Value> {
    let total: f64 = request.expenses.iter().map(|e| e.amount).sum();
    Json(json!({
        "prediction": {
            "predictedMonthlyBudget": total,
            "confidence": 0.85,
            "method": "linear_regression",
            "r2_score": 0.85,
            "received": request.expenses.len()
        }
    }))
}

async fn handle_analyze_patterns(Json(request): Json<InsightRequest>) -> Json<Value> {
    Json(json!({
        "clusters": [],
        "pattern_analysis": [],
        "method": "kmeans_clustering",
        "received": request.expenses.len()
    }))
}

async fn handle_detect_anomalies(Json(request): Json<InsightRequest>) -> Json<Value> {
    Json(json!({
        "anomalies": [],
        "total_detected": 0,
        "method": "combined_statistical",
        "received": request.expenses.len()
    }))
}

async fn handle_error() -> (StatusCode, Json<Value>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "message": "Error in analysis" })),
    )
}

//! REST API client and saved session
//!
//! The session is loaded from disk once per invocation and handed to the
//! `ApiClient`; nothing else reads or writes credentials.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use smartspender_core::analytics::Stats;
use smartspender_core::insights::InsightKind;
use smartspender_core::models::{Expense, ExpenseUpdate, NewExpense, User};

/// Credentials for one signed-in user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Server base URL, e.g. `http://localhost:5000`
    pub base_url: String,
    pub token: String,
    pub user: User,
}

impl Session {
    /// `<config dir>/smartspender/session.toml`
    pub fn default_path() -> Result<PathBuf> {
        let dir = dirs::config_dir().context("Could not determine config directory")?;
        Ok(dir.join("smartspender").join("session.toml"))
    }

    /// Load a saved session; `None` if there is none
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read session file {}", path.display()))?;
        let session = toml::from_str(&content)
            .with_context(|| format!("Invalid session file {}", path.display()))?;
        Ok(Some(session))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize session")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write session file {}", path.display()))?;
        Ok(())
    }

    /// Remove the saved session; returns false if there was none
    pub fn clear(path: &Path) -> Result<bool> {
        if !path.exists() {
            return Ok(false);
        }
        std::fs::remove_file(path)
            .with_context(|| format!("Failed to remove session file {}", path.display()))?;
        Ok(true)
    }
}

/// Response to register and login
#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    message: String,
}

/// Answer from an insight endpoint
#[derive(Debug, Clone, PartialEq)]
pub enum InsightReply {
    /// Below the minimum number of expenses
    NotEnoughData(String),
    /// Payload from the AI service
    Remote(Value),
    /// AI service unavailable; locally computed result
    Fallback(Value),
}

/// API path for an insight
pub fn insight_path(kind: InsightKind) -> &'static str {
    match kind {
        InsightKind::BudgetPrediction => "/api/insights/budget-prediction",
        InsightKind::SpendingPatterns => "/api/insights/spending-patterns",
        InsightKind::Anomalies => "/api/insights/anomalies",
    }
}

/// Thin client over the REST API
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Unauthenticated client (for login)
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        }
    }

    /// Client acting as the session's user
    pub fn from_session(session: &Session) -> Self {
        Self {
            token: Some(session.token.clone()),
            ..Self::new(&session.base_url)
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!(%method, %url, "API request");
        let builder = self.http.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(&self, builder: reqwest::RequestBuilder) -> Result<T> {
        let response = builder
            .send()
            .await
            .with_context(|| format!("Could not reach server at {}", self.base_url))?;
        let status = response.status();
        let body: Value = response.json().await.context("Invalid response from server")?;

        if !status.is_success() {
            bail!("{} ({})", error_message(&body), status);
        }
        serde_json::from_value(body).context("Unexpected response shape")
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse> {
        let body = serde_json::json!({ "email": email, "password": password });
        self.send(self.request(reqwest::Method::POST, "/api/auth/login").json(&body))
            .await
    }

    pub async fn me(&self) -> Result<User> {
        self.send(self.request(reqwest::Method::GET, "/api/auth/me"))
            .await
    }

    /// All expenses, newest first
    pub async fn list_expenses(&self) -> Result<Vec<Expense>> {
        self.send(self.request(reqwest::Method::GET, "/api/expenses"))
            .await
    }

    pub async fn create_expense(&self, expense: &NewExpense) -> Result<Expense> {
        self.send(self.request(reqwest::Method::POST, "/api/expenses").json(expense))
            .await
    }

    pub async fn update_expense(&self, id: i64, update: &ExpenseUpdate) -> Result<Expense> {
        let path = format!("/api/expenses/{}", id);
        self.send(self.request(reqwest::Method::PUT, &path).json(update))
            .await
    }

    /// Returns the server's confirmation message
    pub async fn delete_expense(&self, id: i64) -> Result<String> {
        let path = format!("/api/expenses/{}", id);
        let response: MessageResponse = self
            .send(self.request(reqwest::Method::DELETE, &path))
            .await?;
        Ok(response.message)
    }

    pub async fn stats(&self) -> Result<Stats> {
        self.send(self.request(reqwest::Method::GET, "/api/expenses/stats"))
            .await
    }

    /// Fetch an insight; a 503 with a fallback is a normal answer, not an error
    pub async fn insight(&self, kind: InsightKind) -> Result<InsightReply> {
        let response = self
            .request(reqwest::Method::GET, insight_path(kind))
            .send()
            .await
            .with_context(|| format!("Could not reach server at {}", self.base_url))?;
        let status = response.status();
        let body: Value = response.json().await.context("Invalid response from server")?;

        if status == StatusCode::SERVICE_UNAVAILABLE {
            if let Some(fallback) = body.get("fallback") {
                return Ok(InsightReply::Fallback(fallback.clone()));
            }
        }
        if !status.is_success() {
            bail!("{} ({})", error_message(&body), status);
        }

        let below_minimum = body.get("message").is_some()
            && match kind {
                InsightKind::BudgetPrediction => body["prediction"].is_null(),
                InsightKind::SpendingPatterns => body["patterns"].is_null(),
                InsightKind::Anomalies => body["anomalies"]
                    .as_array()
                    .map(|a| a.is_empty())
                    .unwrap_or(false),
            };
        if below_minimum {
            let message = body["message"].as_str().unwrap_or_default().to_string();
            return Ok(InsightReply::NotEnoughData(message));
        }

        Ok(InsightReply::Remote(body))
    }
}

fn error_message(body: &Value) -> String {
    body.get("error")
        .or_else(|| body.get("message"))
        .and_then(|v| v.as_str())
        .unwrap_or("Request failed")
        .to_string()
}

//! SmartSpender Web Server
//!
//! Axum-based REST API for the SmartSpender expense tracker.
//!
//! Security features:
//! - Bearer-token (HS256 JWT) authentication on every non-public route
//! - Strict per-user scoping of expense data
//! - Restrictive CORS policy
//! - Sanitized error responses

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use tower_http::{cors::CorsLayer, set_header::SetResponseHeaderLayer, trace::TraceLayer};
use tracing::{error, info, warn};

use smartspender_core::ai::{InsightBackend, InsightClient};
use smartspender_core::db::Database;
use smartspender_core::models::User;

mod handlers;
pub mod token;

/// Maximum accepted JSON body size (64 KB)
pub const MAX_BODY_SIZE: usize = 64 * 1024;

/// Environment variable holding the token signing secret
pub const JWT_SECRET_ENV: &str = "SMARTSPENDER_JWT_SECRET";

/// Environment variable overriding the token lifetime
pub const TOKEN_TTL_ENV: &str = "SMARTSPENDER_TOKEN_TTL_HOURS";

/// Environment variable listing allowed CORS origins (comma separated)
pub const ALLOWED_ORIGINS_ENV: &str = "SMARTSPENDER_ALLOWED_ORIGINS";

/// Default token lifetime: one week
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 168;

/// Authorization header for bearer tokens
const AUTHORIZATION_HEADER: &str = "authorization";

/// Server configuration
#[derive(Clone)]
pub struct ServerConfig {
    /// Secret used to sign and verify bearer tokens
    pub jwt_secret: String,
    /// Lifetime of issued tokens
    pub token_ttl_hours: i64,
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
}

impl ServerConfig {
    pub fn new(jwt_secret: &str) -> Self {
        Self {
            jwt_secret: jwt_secret.to_string(),
            token_ttl_hours: DEFAULT_TOKEN_TTL_HOURS,
            allowed_origins: vec![],
        }
    }

    /// Build configuration from environment variables
    ///
    /// Fails if `SMARTSPENDER_JWT_SECRET` is unset or empty.
    pub fn from_env() -> anyhow::Result<Self> {
        let jwt_secret = std::env::var(JWT_SECRET_ENV)
            .ok()
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "{} must be set to sign authentication tokens",
                    JWT_SECRET_ENV
                )
            })?;

        let token_ttl_hours = match std::env::var(TOKEN_TTL_ENV) {
            Ok(v) => v
                .parse()
                .map_err(|_| anyhow::anyhow!("{} must be a whole number of hours", TOKEN_TTL_ENV))?,
            Err(_) => DEFAULT_TOKEN_TTL_HOURS,
        };

        let allowed_origins = std::env::var(ALLOWED_ORIGINS_ENV)
            .map(|v| parse_origins(&v))
            .unwrap_or_default();

        Ok(Self {
            jwt_secret,
            token_ttl_hours,
            allowed_origins,
        })
    }
}

/// Parse a comma-separated origin list
pub fn parse_origins(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Shared application state
pub struct AppState {
    pub db: Database,
    pub config: ServerConfig,
    /// Remote AI service; `None` means every insight uses the local fallback
    pub ai: Option<InsightClient>,
}

/// The authenticated caller, attached to the request by `auth_middleware`
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

/// Get the authenticated user from a request
pub(crate) fn auth_user(request: &Request) -> Result<AuthUser, AppError> {
    request
        .extensions()
        .get::<AuthUser>()
        .cloned()
        .ok_or_else(AppError::unauthorized)
}

/// Authentication middleware - validates the bearer token and loads its user
///
/// A token for a user that no longer exists is rejected like an invalid one.
async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let bearer = request
        .headers()
        .get(AUTHORIZATION_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string());

    let Some(bearer) = bearer else {
        warn!(path = %request.uri().path(), "Unauthorized request - no bearer token");
        return AppError::unauthorized().into_response();
    };

    let user_id = match token::verify_token(&bearer, &state.config.jwt_secret) {
        Ok(id) => id,
        Err(e) => {
            warn!(error = %e, path = %request.uri().path(), "Unauthorized request");
            return AppError::unauthorized().into_response();
        }
    };

    match state.db.get_user(user_id) {
        Ok(Some(user)) => {
            request.extensions_mut().insert(AuthUser(user));
            next.run(request).await
        }
        Ok(None) => {
            warn!(user_id, "Token for unknown user");
            AppError::unauthorized().into_response()
        }
        Err(e) => AppError::from(e).into_response(),
    }
}

/// Create the application router, configuring the AI client from the environment
pub fn create_router(db: Database, config: ServerConfig) -> Router {
    let ai = InsightClient::from_env();
    match &ai {
        Some(client) => info!("AI service configured: {}", client.host()),
        None => info!("ℹ️  AI service disabled (AI_BACKEND=none), insights use local fallbacks"),
    }
    create_router_with_ai(db, config, ai)
}

/// Create the application router with an explicit AI client (for testing)
pub fn create_router_with_ai(
    db: Database,
    config: ServerConfig,
    ai: Option<InsightClient>,
) -> Router {
    let state = Arc::new(AppState {
        db,
        config: config.clone(),
        ai,
    });

    let public_routes = Router::new()
        .route("/health", get(handlers::health))
        .route("/auth/register", post(handlers::register))
        .route("/auth/login", post(handlers::login));

    let protected_routes = Router::new()
        // Auth
        .route("/auth/me", get(handlers::get_me))
        // Expenses
        .route(
            "/expenses",
            get(handlers::list_expenses).post(handlers::create_expense),
        )
        .route("/expenses/stats", get(handlers::get_stats))
        .route(
            "/expenses/:id",
            put(handlers::update_expense).delete(handlers::delete_expense),
        )
        // Insights
        .route(
            "/insights/budget-prediction",
            get(handlers::budget_prediction),
        )
        .route(
            "/insights/spending-patterns",
            get(handlers::spending_patterns),
        )
        .route("/insights/anomalies", get(handlers::anomalies))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Build CORS layer
    let cors = if config.allowed_origins.is_empty() {
        // Restrictive default: only allow same-origin
        CorsLayer::new()
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    } else {
        // Allow specified origins
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    };

    Router::new()
        .nest("/api", public_routes.merge(protected_routes))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Security headers
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
}

/// Start the server with configuration from the environment
pub async fn serve(db: Database, host: &str, port: u16) -> anyhow::Result<()> {
    serve_with_config(db, host, port, ServerConfig::from_env()?).await
}

/// Start the server with custom configuration
pub async fn serve_with_config(
    db: Database,
    host: &str,
    port: u16,
    config: ServerConfig,
) -> anyhow::Result<()> {
    // Check AI service connection
    check_ai_connection().await;

    let app = create_router(db, config);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Check and log AI service connection status
async fn check_ai_connection() {
    match InsightClient::from_env() {
        Some(client) => {
            if client.health_check().await {
                info!("✅ AI service connected: {}", client.host());
            } else {
                warn!(
                    "⚠️  AI service configured but not responding: {} (insights will use local fallbacks)",
                    client.host()
                );
            }
        }
        None => {
            info!("ℹ️  AI service not configured (set AI_BACKEND=http to enable remote insights)");
        }
    }
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn unauthorized() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: "Authentication required".to_string(),
            internal: None,
        }
    }

    pub fn invalid_credentials() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: "Invalid credentials".to_string(),
            internal: None,
        }
    }

    pub fn not_found(msg: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn internal(msg: &str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn conflict(msg: &str) -> Self {
        Self {
            status: StatusCode::CONFLICT,
            message: msg.to_string(),
            internal: None,
        }
    }

    /// Map a core error onto the matching client error where there is one
    pub fn from_core(err: smartspender_core::Error) -> Self {
        use smartspender_core::Error;

        match err {
            Error::InvalidData(msg) => Self::bad_request(&msg),
            Error::NotFound(msg) => Self::not_found(&msg),
            Error::Conflict(msg) => Self::conflict(&msg),
            Error::Auth(_) => Self::invalid_credentials(),
            other => Self::from(other),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = Json(serde_json::json!({
            "error": self.message,
            "message": self.message
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let err = err.into();
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            // Return generic message to client
            message: "An internal error occurred".to_string(),
            // Keep full error for logging
            internal: Some(err),
        }
    }
}

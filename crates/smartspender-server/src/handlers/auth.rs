//! Authentication-related handlers

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::read_json;
use crate::{auth_user, token, AppError, AppState};
use smartspender_core::auth;
use smartspender_core::models::User;

/// Request body for registration
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

/// Request body for login
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response for register and login
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

/// POST /api/auth/register - Create an account and sign in
pub async fn register(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let req: RegisterRequest = read_json(request).await?;

    let user = auth::register_user(&state.db, &req.email, &req.name, &req.password)
        .map_err(AppError::from_core)?;
    let token = token::issue_token(user.id, &state.config.jwt_secret, state.config.token_ttl_hours)?;

    Ok((StatusCode::CREATED, Json(AuthResponse { token, user })))
}

/// POST /api/auth/login - Exchange credentials for a token
pub async fn login(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<AuthResponse>, AppError> {
    let req: LoginRequest = read_json(request).await?;

    let user =
        auth::authenticate(&state.db, &req.email, &req.password).map_err(AppError::from_core)?;
    let token = token::issue_token(user.id, &state.config.jwt_secret, state.config.token_ttl_hours)?;
    info!(user_id = user.id, "User logged in");

    Ok(Json(AuthResponse { token, user }))
}

/// GET /api/auth/me - Get the currently authenticated user
pub async fn get_me(request: Request) -> Result<Json<User>, AppError> {
    let user = auth_user(&request)?;
    Ok(Json(user.0))
}

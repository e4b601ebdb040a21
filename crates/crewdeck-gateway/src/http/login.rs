use std::sync::Arc;

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};

use super::{blocking, error::ApiError};
use crate::app::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

/// POST /api/login: exchange operator credentials for a bearer token.
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(req) = payload?;
    // argon2 verification is CPU-bound
    let token = blocking(&state, move |s| {
        Ok(s.access.login(&req.username, &req.password)?)
    })
    .await?;
    Ok(Json(LoginResponse { token }))
}

use std::sync::Arc;

use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::app::AppState;

/// GET /: plain-text liveness line.
pub async fn root_handler() -> &'static str {
    "API is up"
}

/// GET /health: liveness check with build version and the configured listen address.
pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<Value> {
    let server = &state.config.server;
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "bind": format!("{}:{}", server.bind, server.port),
    }))
}

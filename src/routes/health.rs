use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::AppState;

/// Health check endpoint
///
/// Reports the response strategy in use and how many detached deletions
/// are still running. Used by load balancers and monitoring systems.
pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "deletion_mode": state.config.deletion_mode.as_str(),
        "pending_deletions": state.tasks.len(),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

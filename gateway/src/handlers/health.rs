use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

use crate::state::AppState;

/// Liveness plus a database ping when a pool is configured
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let database = match &state.pool {
        Some(pool) => match db::health_check(pool).await {
            Ok(()) => "up",
            Err(e) => {
                tracing::warn!(error = %e, "Database health check failed");
                return (
                    StatusCode::SERVICE_UNAVAILABLE,
                    Json(json!({"status": "unavailable", "database": "down"})),
                );
            }
        },
        None => "in-memory",
    };

    (
        StatusCode::OK,
        Json(json!({"status": "ok", "database": database})),
    )
}

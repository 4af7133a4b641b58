//! # GET /healthcheck

use axum::Json;
use holdem_types::HealthResponse;

/// GET /healthcheck - 死活監視。
pub async fn handle_healthcheck() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

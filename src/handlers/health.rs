use axum::Json;
use serde::Serialize;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Liveness check. Does not touch the database.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

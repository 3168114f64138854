use axum::{http::StatusCode, response::IntoResponse};

/// Liveness probe. Deliberately independent of the database handle.
pub async fn health_check() -> impl IntoResponse {
    tracing::debug!("Health endpoint hit");
    (StatusCode::OK, "OK")
}

use crate::api::MgmtState;
use crate::api::schemas::health::HealthResponse;
use crate::services::health_service::ComponentStatus;
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

/// Liveness probe: returns 200 OK as long as the server is running.
pub async fn livez() -> impl IntoResponse {
    StatusCode::OK
}

/// Readiness probe. Only a configured but unreachable database fails it; a
/// missing email relay is reported without failing.
pub async fn readyz(State(state): State<MgmtState>) -> impl IntoResponse {
    let db_status = state.health_service.check_db().await;

    let status_code = if db_status == ComponentStatus::Error {
        tracing::warn!(component = "database", "Readiness probe failed");
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    };

    let response = HealthResponse {
        status: if status_code == StatusCode::OK { "ok" } else { "error" }.to_string(),
        database: db_status.as_str().to_string(),
        email: if state.health_service.email_configured() { "ok" } else { "unconfigured" }.to_string(),
    };

    (status_code, Json(response))
}

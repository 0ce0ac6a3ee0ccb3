use crate::api::AppState;
use axum::{Json, extract::State, response::IntoResponse};

pub async fn recent_activity(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.activity.recent().await)
}

use crate::api::AppState;
use crate::error::{AppError, Result};
use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use uuid::Uuid;

pub async fn list_projects(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.projects.list_all().await)
}

pub async fn list_featured_projects(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.projects.list_featured().await)
}

/// # Errors
/// Returns `AppError::NotFound` if no project has this id. Ids that are not
/// UUIDs cannot match any project.
pub async fn get_project(State(state): State<AppState>, Path(id): Path<String>) -> Result<impl IntoResponse> {
    let project = match Uuid::parse_str(&id) {
        Ok(id) => state.projects.get_by_id(id).await,
        Err(_) => None,
    };
    project.map(Json).ok_or_else(|| AppError::NotFound("Project not found".to_string()))
}

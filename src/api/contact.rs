use crate::api::AppState;
use crate::api::schemas::contact::{ContactRequest, ContactStatus, FieldEvent, FieldUpdate, SessionCreated, SubmitResponse};
use crate::domain::contact::{FieldErrors, SubmissionPayload};
use crate::domain::delivery::ErrorCategory;
use crate::error::{AppError, Result};
use crate::services::feedback::FeedbackPresenter;
use crate::services::submission::ContactForm;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;
use uuid::Uuid;

/// Validates and delivers a contact message in one request.
///
/// # Errors
/// Returns `AppError::Validation` if any field fails its rule.
pub async fn send_message(State(state): State<AppState>, Json(req): Json<ContactRequest>) -> Result<impl IntoResponse> {
    let payload = SubmissionPayload::from(req);
    let errors = FieldErrors::validate_all(&payload);
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let result = state.delivery.deliver(&payload.trimmed()).await;
    let status = match result.error_category {
        None => StatusCode::OK,
        Some(ErrorCategory::NotConfigured) => StatusCode::SERVICE_UNAVAILABLE,
        Some(ErrorCategory::InvalidInput) => StatusCode::BAD_REQUEST,
        Some(_) => StatusCode::BAD_GATEWAY,
    };
    Ok((status, Json(result)))
}

pub async fn status(State(state): State<AppState>) -> impl IntoResponse {
    let available = state.delivery.is_available();
    Json(ContactStatus { available, advisory: FeedbackPresenter::advisory(available) })
}

pub async fn create_session(State(state): State<AppState>) -> impl IntoResponse {
    let (id, form) = state.sessions.create();
    (StatusCode::CREATED, Json(SessionCreated { id, view: form.view() }))
}

/// # Errors
/// Returns `AppError::NotFound` if the session does not exist.
pub async fn get_session(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<impl IntoResponse> {
    let form = find(&state, id)?;
    Ok(Json(form.view()))
}

/// Applies a change or blur event to one field.
///
/// # Errors
/// Returns `AppError::NotFound` if the session does not exist.
pub async fn update_field(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(update): Json<FieldUpdate>,
) -> Result<impl IntoResponse> {
    let form = find(&state, id)?;
    if let Some(value) = update.value {
        form.set_field(&update.field, value);
    }
    if matches!(update.event, FieldEvent::Blur) {
        form.blur(&update.field);
    }
    Ok(Json(form.view()))
}

/// # Errors
/// Returns `AppError::NotFound` if the session does not exist.
pub async fn submit_session(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<impl IntoResponse> {
    let form = find(&state, id)?;
    let outcome = form.submit().await;
    Ok(Json(SubmitResponse { outcome: outcome.as_str(), view: form.view() }))
}

/// # Errors
/// Returns `AppError::NotFound` if the session does not exist.
pub async fn delete_session(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<impl IntoResponse> {
    if state.sessions.remove(id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(session_not_found())
    }
}

fn find(state: &AppState, id: Uuid) -> Result<Arc<ContactForm>> {
    state.sessions.get(id).ok_or_else(session_not_found)
}

fn session_not_found() -> AppError {
    AppError::NotFound("Contact session not found".to_string())
}

use crate::api::AppState;
use crate::error::{AppError, Result};
use crate::services::resume::ResumeError;
use axum::{
    body::Body,
    extract::State,
    http::{HeaderValue, header},
    response::{IntoResponse, Response},
};

/// Streams the resume from its upstream location as a forced download.
///
/// # Errors
/// Returns `AppError::NotFound` if upstream has no document and
/// `AppError::Internal` if upstream cannot be reached.
pub async fn download_resume(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let document = state.resume.fetch().await.map_err(|e| match e {
        ResumeError::Upstream(_) => AppError::NotFound("Resume not found".to_string()),
        ResumeError::Transport(_) => AppError::Internal("Failed to download resume".to_string()),
    })?;

    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{}\"", state.resume.filename()))
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"));

    let mut response = Response::new(Body::from_stream(document.body));
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/pdf"));
    headers.insert(header::CONTENT_DISPOSITION, disposition);
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("public, max-age=3600"));
    headers.insert("x-robots-tag", HeaderValue::from_static("noindex"));
    if let Some(len) = document.content_length {
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from(len));
    }

    Ok(response)
}

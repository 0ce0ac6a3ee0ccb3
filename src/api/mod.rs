use crate::config::Config;
use crate::services::activity::ActivityService;
use crate::services::delivery::DeliveryAdapter;
use crate::services::health_service::HealthService;
use crate::services::projects::ProjectService;
use crate::services::resume::ResumeService;
use crate::services::sessions::FormSessions;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::{
    Router,
    routing::{get, post},
};
use std::time::Duration;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

pub mod activity;
pub mod contact;
pub mod health;
pub mod middleware;
pub mod projects;
pub mod resume;
pub mod schemas;

#[derive(Clone, Debug)]
pub struct AppState {
    pub delivery: DeliveryAdapter,
    pub sessions: FormSessions,
    pub resume: ResumeService,
    pub projects: ProjectService,
    pub activity: ActivityService,
}

#[derive(Clone, Debug)]
pub struct MgmtState {
    pub health_service: HealthService,
}

#[derive(Debug)]
pub struct ServiceContainer {
    pub delivery: DeliveryAdapter,
    pub sessions: FormSessions,
    pub resume: ResumeService,
    pub projects: ProjectService,
    pub activity: ActivityService,
}

/// Configures and returns the public application router.
pub fn app_router(config: &Config, services: ServiceContainer) -> Router {
    let request_timeout = Duration::from_secs(config.server.request_timeout_secs);

    let state = AppState {
        delivery: services.delivery,
        sessions: services.sessions,
        resume: services.resume,
        projects: services.projects,
        activity: services.activity,
    };

    let contact_routes = Router::new()
        .route("/", post(contact::send_message))
        .route("/status", get(contact::status))
        .route("/sessions", post(contact::create_session))
        .route(
            "/sessions/{id}",
            get(contact::get_session).patch(contact::update_field).delete(contact::delete_session),
        )
        .route("/sessions/{id}/submit", post(contact::submit_session));

    let api_routes = Router::new()
        .nest("/contact", contact_routes)
        .route("/download-resume", get(resume::download_resume))
        .route("/projects", get(projects::list_projects))
        .route("/projects/featured", get(projects::list_featured_projects))
        .route("/projects/{id}", get(projects::get_project))
        .route("/activity", get(activity::recent_activity));

    Router::new()
        .nest("/api", api_routes)
        .layer(TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, request_timeout))
        .layer(PropagateRequestIdLayer::new(axum::http::HeaderName::from_static("x-request-id")))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(move |request: &Request<Body>| {
                    let request_id = request
                        .extensions()
                        .get::<tower_http::request_id::RequestId>()
                        .map(|id| id.header_value().to_str().unwrap_or_default())
                        .unwrap_or_default()
                        .to_string();

                    tracing::info_span!(
                        "request",
                        "request_id" = %request_id,
                        "http.request.method" = %request.method(),
                        "url.path" = %request.uri().path(),
                        "http.response.status_code" = tracing::field::Empty,
                        "otel.kind" = "server",
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>, latency: Duration, _span: &tracing::Span| {
                        let status = response.status();
                        tracing::Span::current().record("http.response.status_code", status.as_u16());

                        tracing::info!(
                            latency_ms = %latency.as_millis(),
                            status = %status.as_u16(),
                            "request completed"
                        );
                    },
                )
                .on_failure(|error, _latency, _span: &tracing::Span| {
                    tracing::error!(error = %error, "request failed");
                }),
        )
        .layer(SetRequestIdLayer::new(
            axum::http::HeaderName::from_static("x-request-id"),
            middleware::MakeRequestUuidOrHeader,
        ))
        .with_state(state)
}

pub fn mgmt_router(state: MgmtState) -> Router {
    Router::new().route("/livez", get(health::livez)).route("/readyz", get(health::readyz)).with_state(state)
}

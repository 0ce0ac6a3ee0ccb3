#![allow(dead_code, clippy::unwrap_used, clippy::missing_panics_doc, unreachable_pub, missing_debug_implementations)]
use axum::{
    Json, Router,
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};
use portfolio_server::AppBuilder;
use portfolio_server::adapters::database::DbPool;
use portfolio_server::api::{MgmtState, app_router, mgmt_router};
use portfolio_server::config::{
    ActivityConfig, Config, ContactConfig, DatabaseConfig, EmailConfig, HealthConfig, LogFormat, ResumeConfig,
    ServerConfig, TelemetryConfig,
};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;
use tokio::net::TcpListener;

static INIT: Once = Once::new();

pub const RESUME_BYTES: &[u8] = b"%PDF-1.4 fake resume";

pub fn setup_tracing() {
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "warn".into())
            .add_directive("portfolio_server=debug".parse().unwrap())
            .add_directive("tower=warn".parse().unwrap())
            .add_directive("hyper=warn".parse().unwrap())
            .add_directive("reqwest=warn".parse().unwrap());

        tracing_subscriber::fmt().with_env_filter(filter).init();
    });
}

/// Configuration pointing every outbound call at `upstream_url`.
pub fn get_test_config(upstream_url: &str) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            mgmt_port: 0,
            request_timeout_secs: 10,
            shutdown_timeout_secs: 1,
        },
        email: EmailConfig {
            service_id: Some("service_test".to_string()),
            template_id: Some("template_test".to_string()),
            public_key: Some("public_test".to_string()),
            api_url: format!("{upstream_url}/email/send"),
            recipient_name: "Turki".to_string(),
            utc_offset_hours: 3,
            timeout_ms: 2_000,
        },
        contact: ContactConfig { dismiss_after_secs: 7, session_ttl_secs: 1800, session_sweep_interval_secs: 60 },
        resume: ResumeConfig {
            url: format!("{upstream_url}/files/resume.pdf"),
            filename: "Turki_Naif_Alghamdi_Resume.pdf".to_string(),
        },
        database: DatabaseConfig { url: None, max_connections: 1, acquire_timeout_secs: 1, run_migrations: false },
        activity: ActivityConfig {
            api_url: upstream_url.to_string(),
            username: "octo".to_string(),
            scan_limit: 15,
            display_limit: 3,
            user_agent: "Portfolio-App".to_string(),
            timeout_ms: 2_000,
        },
        health: HealthConfig { db_timeout_ms: 500 },
        telemetry: TelemetryConfig { log_format: LogFormat::Text, otlp_endpoint: None },
    }
}

#[derive(Debug)]
struct RelayBehavior {
    status: StatusCode,
    text: String,
    delay: Duration,
}

#[derive(Clone, Default)]
struct UpstreamState {
    relay: Arc<Mutex<Option<RelayBehavior>>>,
    sent: Arc<Mutex<Vec<Value>>>,
    events: Arc<Mutex<Value>>,
}

/// Stand-in for every upstream the app talks to.
#[derive(Clone)]
pub struct FakeUpstream {
    pub url: String,
    state: UpstreamState,
}

impl FakeUpstream {
    pub async fn spawn() -> Self {
        let state = UpstreamState { events: Arc::new(Mutex::new(json!([]))), ..UpstreamState::default() };

        let router = Router::new()
            .route("/email/send", post(relay_send))
            .route("/files/resume.pdf", get(resume_file))
            .route("/users/{username}/events/public", get(public_events))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self { url, state }
    }

    /// Makes the relay answer with `status` and `text` from now on.
    pub fn respond_with(&self, status: StatusCode, text: &str) {
        self.set_relay(status, text, Duration::ZERO);
    }

    /// Makes the relay hold each request for `delay` before answering OK.
    pub fn delay_relay(&self, delay: Duration) {
        self.set_relay(StatusCode::OK, "OK", delay);
    }

    fn set_relay(&self, status: StatusCode, text: &str, delay: Duration) {
        *self.state.relay.lock().unwrap() = Some(RelayBehavior { status, text: text.to_string(), delay });
    }

    /// Bodies received by the relay, in order.
    pub fn sent(&self) -> Vec<Value> {
        self.state.sent.lock().unwrap().clone()
    }

    pub fn set_events(&self, events: Value) {
        *self.state.events.lock().unwrap() = events;
    }
}

async fn relay_send(State(state): State<UpstreamState>, Json(body): Json<Value>) -> impl IntoResponse {
    state.sent.lock().unwrap().push(body);
    let (status, text, delay) = state
        .relay
        .lock()
        .unwrap()
        .as_ref()
        .map_or((StatusCode::OK, "OK".to_string(), Duration::ZERO), |b| (b.status, b.text.clone(), b.delay));
    tokio::time::sleep(delay).await;
    (status, text)
}

async fn resume_file() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/octet-stream")], RESUME_BYTES)
}

async fn public_events(State(state): State<UpstreamState>, Path(username): Path<String>) -> impl IntoResponse {
    if username == "broken" {
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "message": "boom" })));
    }
    let events = state.events.lock().unwrap().clone();
    (StatusCode::OK, Json(events))
}

pub struct TestApp {
    pub api_url: String,
    pub mgmt_url: String,
    pub client: reqwest::Client,
    pub config: Config,
    pub upstream: FakeUpstream,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let upstream = FakeUpstream::spawn().await;
        let config = get_test_config(&upstream.url);
        Self::spawn_with(config, upstream, None).await
    }

    /// Spawns the app with a config derived from the default test config.
    pub async fn spawn_with_config(adjust: impl FnOnce(&mut Config)) -> Self {
        let upstream = FakeUpstream::spawn().await;
        let mut config = get_test_config(&upstream.url);
        adjust(&mut config);
        Self::spawn_with(config, upstream, None).await
    }

    pub async fn spawn_with(config: Config, upstream: FakeUpstream, pool: Option<DbPool>) -> Self {
        setup_tracing();

        let app = AppBuilder::new(config.clone()).with_database(pool).build().unwrap();
        let router = app_router(&config, app.services);
        let mgmt = mgmt_router(MgmtState { health_service: app.health_service });

        let api_listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let mgmt_listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let api_url = format!("http://{}", api_listener.local_addr().unwrap());
        let mgmt_url = format!("http://{}", mgmt_listener.local_addr().unwrap());

        tokio::spawn(async move {
            axum::serve(api_listener, router).await.unwrap();
        });
        tokio::spawn(async move {
            axum::serve(mgmt_listener, mgmt).await.unwrap();
        });

        Self { api_url, mgmt_url, client: reqwest::Client::new(), config, upstream }
    }

    pub async fn post_contact(&self, body: Value) -> reqwest::Response {
        self.client.post(format!("{}/api/contact", self.api_url)).json(&body).send().await.unwrap()
    }

    /// Opens a server-held contact form and returns its id.
    pub async fn create_session(&self) -> String {
        let resp = self.client.post(format!("{}/api/contact/sessions", self.api_url)).send().await.unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = resp.json().await.unwrap();
        body["id"].as_str().unwrap().to_string()
    }

    pub async fn update_field(&self, id: &str, field: &str, value: &str) -> Value {
        self.client
            .patch(format!("{}/api/contact/sessions/{id}", self.api_url))
            .json(&json!({ "field": field, "value": value }))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap()
    }

    pub async fn submit(&self, id: &str) -> reqwest::Response {
        self.client.post(format!("{}/api/contact/sessions/{id}/submit", self.api_url)).send().await.unwrap()
    }
}

pub fn valid_message() -> Value {
    json!({ "name": "Ada", "email": "ada@example.com", "message": "Hello, this is long enough." })
}

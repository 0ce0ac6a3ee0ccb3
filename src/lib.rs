#![forbid(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::todo)]
#![warn(clippy::panic)]
#![warn(clippy::dbg_macro)]
#![warn(clippy::print_stdout)]
#![warn(clippy::print_stderr)]
#![warn(clippy::clone_on_ref_ptr)]
#![warn(unreachable_pub)]
#![warn(missing_debug_implementations)]
#![warn(unused_qualifications)]
#![deny(unused_must_use)]

pub mod adapters;
pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod services;
pub mod telemetry;
pub mod workers;

use crate::adapters::database::DbPool;
use crate::adapters::database::project_repo::ProjectRepository;
use crate::adapters::email::{EmailJsRelay, EmailRelay};
use crate::adapters::github::EventFeedClient;
use crate::api::ServiceContainer;
use crate::config::Config;
use crate::services::activity::ActivityService;
use crate::services::delivery::DeliveryAdapter;
use crate::services::health_service::HealthService;
use crate::services::projects::ProjectService;
use crate::services::resume::ResumeService;
use crate::services::sessions::FormSessions;
use crate::workers::SessionCleanupWorker;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Background tasks owned by the application.
#[derive(Debug)]
pub struct Workers {
    pub session_cleanup: SessionCleanupWorker,
}

impl Workers {
    #[must_use]
    pub fn spawn_all(self, shutdown_rx: watch::Receiver<bool>) -> Vec<JoinHandle<()>> {
        vec![tokio::spawn(self.session_cleanup.run(shutdown_rx))]
    }
}

#[derive(Debug)]
pub struct App {
    pub services: ServiceContainer,
    pub health_service: HealthService,
    pub workers: Workers,
}

/// Wires services from configuration. Collaborators that talk to the outside
/// world can be swapped before `build`.
#[derive(Debug)]
pub struct AppBuilder {
    config: Config,
    pool: Option<DbPool>,
    email_relay: Option<Arc<dyn EmailRelay>>,
    http_client: Option<reqwest::Client>,
}

impl AppBuilder {
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config, pool: None, email_relay: None, http_client: None }
    }

    #[must_use]
    pub fn with_database(mut self, pool: Option<DbPool>) -> Self {
        self.pool = pool;
        self
    }

    #[must_use]
    pub fn with_email_relay(mut self, relay: Arc<dyn EmailRelay>) -> Self {
        self.email_relay = Some(relay);
        self
    }

    #[must_use]
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// # Errors
    /// Returns an error if one of the outbound HTTP clients cannot be built.
    pub fn build(self) -> anyhow::Result<App> {
        let config = self.config;

        let email_relay: Arc<dyn EmailRelay> = match self.email_relay {
            Some(relay) => relay,
            None => Arc::new(EmailJsRelay::new(
                config.email.api_url.clone(),
                config.email.public_key.clone().unwrap_or_default(),
                Duration::from_millis(config.email.timeout_ms),
            )?),
        };
        let delivery = DeliveryAdapter::new(&config.email, email_relay);
        if !delivery.is_available() {
            tracing::warn!("Email relay credentials are missing, contact messages will not be sent");
        }

        let sessions = FormSessions::new(Arc::new(delivery.clone()), &config.contact);

        let http_client = match self.http_client {
            Some(client) => client,
            None => reqwest::Client::builder().build()?,
        };
        let resume = ResumeService::new(http_client, &config.resume);

        let projects = ProjectService::new(self.pool.clone(), ProjectRepository::new());

        let feed_client = EventFeedClient::new(
            config.activity.api_url.clone(),
            &config.activity.user_agent,
            Duration::from_millis(config.activity.timeout_ms),
        )?;
        let activity = ActivityService::new(feed_client, &config.activity);

        let health_service = HealthService::new(self.pool, delivery.is_available(), config.health.clone());

        let workers = Workers { session_cleanup: SessionCleanupWorker::new(sessions.clone(), &config.contact) };

        Ok(App {
            services: ServiceContainer { delivery, sessions, resume, projects, activity },
            health_service,
            workers,
        })
    }
}

/// Flips the shutdown channel on SIGINT or SIGTERM.
pub fn spawn_signal_handler(shutdown_tx: watch::Sender<bool>) {
    tokio::spawn(async move {
        let ctrl_c = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to install Ctrl+C handler");
                std::future::pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let terminate = async {
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(mut signal) => {
                    signal.recv().await;
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to install SIGTERM handler");
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            () = ctrl_c => {},
            () = terminate => {},
        }

        tracing::info!("Shutdown signal received");
        let _ = shutdown_tx.send(true);
    });
}

/// Routes panics through tracing so they reach the configured log sink.
pub fn setup_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        let location = info.location().map(|l| format!("{}:{}", l.file(), l.line())).unwrap_or_default();
        let payload = info
            .payload()
            .downcast_ref::<&str>()
            .copied()
            .or_else(|| info.payload().downcast_ref::<String>().map(String::as_str))
            .unwrap_or("<non-string panic payload>");
        tracing::error!(panic.location = %location, panic.message = %payload, "Panic occurred");
    }));
}

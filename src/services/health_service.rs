use crate::adapters::database::DbPool;
use crate::config::HealthConfig;
use opentelemetry::{KeyValue, global, metrics::Gauge};
use std::time::Duration;
use tokio::time::timeout;

#[derive(Clone, Debug)]
pub struct Metrics {
    pub status: Gauge<i64>,
}

impl Metrics {
    #[must_use]
    pub(crate) fn new() -> Self {
        let meter = global::meter("portfolio-server");
        Self {
            status: meter
                .i64_gauge("portfolio_health_status")
                .with_description("Status of health checks (1 for ok, 0 for error)")
                .build(),
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentStatus {
    Ok,
    Disabled,
    Error,
}

impl ComponentStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Disabled => "disabled",
            Self::Error => "error",
        }
    }
}

#[derive(Clone, Debug)]
pub struct HealthService {
    pool: Option<DbPool>,
    email_configured: bool,
    config: HealthConfig,
    metrics: Metrics,
}

impl HealthService {
    #[must_use]
    pub fn new(pool: Option<DbPool>, email_configured: bool, config: HealthConfig) -> Self {
        Self { pool, email_configured, config, metrics: Metrics::new() }
    }

    #[must_use]
    pub const fn email_configured(&self) -> bool {
        self.email_configured
    }

    /// Checks project store connectivity. An unconfigured store is `Disabled`.
    pub async fn check_db(&self) -> ComponentStatus {
        let Some(pool) = &self.pool else {
            return ComponentStatus::Disabled;
        };
        let db_timeout = Duration::from_millis(self.config.db_timeout_ms);

        let status = match timeout(db_timeout, sqlx::query("SELECT 1").execute(pool)).await {
            Ok(Ok(_)) => ComponentStatus::Ok,
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Database connection failed");
                ComponentStatus::Error
            }
            Err(_) => {
                tracing::warn!("Database connection timed out");
                ComponentStatus::Error
            }
        };
        self.metrics
            .status
            .record(i64::from(status == ComponentStatus::Ok), &[KeyValue::new("component", "database")]);
        status
    }
}

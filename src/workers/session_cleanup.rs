use crate::config::ContactConfig;
use crate::services::sessions::FormSessions;
use opentelemetry::{global, metrics::Counter};
use std::time::Duration;

#[derive(Clone, Debug)]
struct Metrics {
    expired: Counter<u64>,
}

impl Metrics {
    fn new() -> Self {
        let meter = global::meter("portfolio-server");
        Self {
            expired: meter
                .u64_counter("contact_sessions_expired_total")
                .with_description("Contact form sessions dropped after sitting idle")
                .build(),
        }
    }
}

#[derive(Debug)]
pub struct SessionCleanupWorker {
    sessions: FormSessions,
    interval: Duration,
    metrics: Metrics,
}

impl SessionCleanupWorker {
    #[must_use]
    pub fn new(sessions: FormSessions, config: &ContactConfig) -> Self {
        Self {
            sessions,
            interval: Duration::from_secs(config.session_sweep_interval_secs.max(1)),
            metrics: Metrics::new(),
        }
    }

    pub async fn run(self, mut shutdown: tokio::sync::watch::Receiver<bool>) {
        let mut interval = tokio::time::interval(self.interval);

        while !*shutdown.borrow() {
            tokio::select! {
                _ = interval.tick() => self.perform_cleanup(),
                res = shutdown.changed() => {
                    if res.is_err() {
                        break;
                    }
                }
            }
        }
        tracing::info!("Session cleanup loop shutting down...");
    }

    #[tracing::instrument(skip(self), fields(expired = tracing::field::Empty))]
    pub fn perform_cleanup(&self) {
        let count = self.sessions.sweep_idle();
        if count > 0 {
            tracing::info!(count, remaining = self.sessions.len(), "Dropped idle contact form sessions");
            tracing::Span::current().record("expired", count);
            self.metrics.expired.add(count as u64, &[]);
        }
    }
}

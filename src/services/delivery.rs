use crate::adapters::email::{EmailRelay, RelayError, TemplateParams};
use crate::config::EmailConfig;
use crate::domain::contact::SubmissionPayload;
use crate::domain::delivery::{DeliveryResult, ErrorCategory, classify};
use opentelemetry::{KeyValue, global, metrics::Counter};
use reqwest::StatusCode;
use std::sync::Arc;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

#[derive(Clone, Debug)]
struct Metrics {
    deliveries: Counter<u64>,
}

impl Metrics {
    fn new() -> Self {
        let meter = global::meter("portfolio-server");
        Self {
            deliveries: meter
                .u64_counter("contact_deliveries_total")
                .with_description("Contact form deliveries by outcome")
                .build(),
        }
    }

    fn record(&self, result: &DeliveryResult) {
        let outcome = result.error_category.map_or("delivered", ErrorCategory::as_str);
        self.deliveries.add(1, &[KeyValue::new("outcome", outcome)]);
    }
}

/// Relay credentials, present only when all three are configured.
#[derive(Clone, Debug)]
struct Credentials {
    service_id: String,
    template_id: String,
}

/// Sends validated contact payloads through the email relay and reduces
/// every outcome to a `DeliveryResult`.
#[derive(Clone, Debug)]
pub struct DeliveryAdapter {
    credentials: Option<Credentials>,
    relay: Arc<dyn EmailRelay>,
    recipient_name: String,
    offset: UtcOffset,
    metrics: Metrics,
}

impl DeliveryAdapter {
    #[must_use]
    pub fn new(config: &EmailConfig, relay: Arc<dyn EmailRelay>) -> Self {
        let credentials = if config.is_configured() {
            Some(Credentials {
                service_id: config.service_id.clone().unwrap_or_default(),
                template_id: config.template_id.clone().unwrap_or_default(),
            })
        } else {
            None
        };
        let offset = UtcOffset::from_hms(config.utc_offset_hours, 0, 0).unwrap_or_else(|_| {
            tracing::warn!(hours = config.utc_offset_hours, "Invalid UTC offset, falling back to UTC");
            UtcOffset::UTC
        });

        Self { credentials, relay, recipient_name: config.recipient_name.clone(), offset, metrics: Metrics::new() }
    }

    /// Whether the relay has credentials. Drives the pre-submission advisory.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        self.credentials.is_some()
    }

    /// Makes exactly one delivery attempt for `payload`.
    #[tracing::instrument(skip_all, fields(outcome = tracing::field::Empty))]
    pub async fn deliver(&self, payload: &SubmissionPayload) -> DeliveryResult {
        let result = self.attempt(payload).await;
        let outcome = result.error_category.map_or("delivered", ErrorCategory::as_str);
        tracing::Span::current().record("outcome", outcome);
        self.metrics.record(&result);
        result
    }

    async fn attempt(&self, payload: &SubmissionPayload) -> DeliveryResult {
        let Some(credentials) = &self.credentials else {
            tracing::warn!("Email relay is not configured, message not sent");
            return DeliveryResult::failed(ErrorCategory::NotConfigured);
        };

        if payload.has_blank_field() {
            return DeliveryResult::failed(ErrorCategory::InvalidInput);
        }

        let params = self.template_params(payload, OffsetDateTime::now_utc());
        let outcome = self
            .relay
            .send(&credentials.service_id, &credentials.template_id, &params)
            .await
            .and_then(|resp| {
                if resp.status == StatusCode::OK {
                    Ok(())
                } else {
                    tracing::debug!(status = resp.status.as_u16(), body = %resp.text, "Relay rejected the message");
                    Err(RelayError::Status(resp.status))
                }
            });

        match outcome {
            Ok(()) => {
                tracing::info!("Contact message delivered");
                DeliveryResult::delivered()
            }
            Err(e) => {
                let category = classify(&e);
                tracing::warn!(error = %e, category = %category, "Contact message delivery failed");
                DeliveryResult::failed(category)
            }
        }
    }

    fn template_params(&self, payload: &SubmissionPayload, now: OffsetDateTime) -> TemplateParams {
        let trimmed = payload.trimmed();
        TemplateParams {
            from_name: trimmed.name,
            from_email: trimmed.email.clone(),
            to_name: self.recipient_name.clone(),
            message: trimmed.message,
            reply_to: trimmed.email,
            current_date: self.format_timestamp(now),
        }
    }

    fn format_timestamp(&self, now: OffsetDateTime) -> String {
        now.to_offset(self.offset)
            .format(format_description!(
                "[month repr:long] [day padding:none], [year] at [hour repr:12]:[minute] [period]"
            ))
            .unwrap_or_else(|_| now.to_string())
    }
}

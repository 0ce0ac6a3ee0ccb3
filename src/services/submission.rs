use crate::domain::contact::{Field, FieldErrors, SubmissionPayload};
use crate::domain::delivery::DeliveryResult;
use crate::services::delivery::DeliveryAdapter;
use crate::services::feedback::{DismissTimer, FeedbackPresenter, FeedbackView};
use async_trait::async_trait;
use futures::FutureExt;
use opentelemetry::{KeyValue, global, metrics::Counter};
use serde::Serialize;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;
use tracing::Instrument;

pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred. Please try again or contact me directly.";

/// Anything able to carry a contact payload to its destination.
#[async_trait]
pub trait Deliver: Send + Sync + std::fmt::Debug {
    /// # Errors
    /// An error means the attempt failed in a way the implementation could not classify.
    async fn deliver(&self, payload: &SubmissionPayload) -> anyhow::Result<DeliveryResult>;

    fn is_available(&self) -> bool;
}

#[async_trait]
impl Deliver for DeliveryAdapter {
    async fn deliver(&self, payload: &SubmissionPayload) -> anyhow::Result<DeliveryResult> {
        Ok(Self::deliver(self, payload).await)
    }

    fn is_available(&self) -> bool {
        Self::is_available(self)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "message", rename_all = "lowercase")]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting,
    Success(String),
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormSnapshot {
    pub payload: SubmissionPayload,
    pub errors: FieldErrors,
    pub state: SubmissionState,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// At least one field failed; nothing was sent.
    Invalid(FieldErrors),
    /// An attempt is already in flight; this call was ignored.
    Busy,
    /// The form has been torn down.
    Closed,
    Completed(SubmissionState),
}

impl SubmitOutcome {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Invalid(_) => "invalid",
            Self::Busy => "busy",
            Self::Closed => "closed",
            Self::Completed(_) => "completed",
        }
    }
}

#[derive(Clone, Debug)]
struct Metrics {
    submissions: Counter<u64>,
}

impl Metrics {
    fn new() -> Self {
        let meter = global::meter("portfolio-server");
        Self {
            submissions: meter
                .u64_counter("contact_submissions_total")
                .with_description("Contact form submit calls by outcome")
                .build(),
        }
    }

    fn record(&self, outcome: &'static str) {
        self.submissions.add(1, &[KeyValue::new("outcome", outcome)]);
    }
}

#[derive(Debug, Default)]
struct FormInner {
    payload: SubmissionPayload,
    errors: FieldErrors,
    state: SubmissionState,
    attempt: u64,
    dismiss: Option<DismissTimer>,
    closed: bool,
}

fn lock(inner: &Mutex<FormInner>) -> MutexGuard<'_, FormInner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

/// One contact form and the lifecycle of its submission attempts.
///
/// State changes happen under a short-lived lock that is never held across
/// the delivery call, so a second `submit` while one is in flight sees
/// `Submitting` and returns `Busy`.
#[derive(Debug)]
pub struct ContactForm {
    inner: Arc<Mutex<FormInner>>,
    delivery: Arc<dyn Deliver>,
    dismiss_after: Duration,
    metrics: Metrics,
}

impl ContactForm {
    #[must_use]
    pub fn new(delivery: Arc<dyn Deliver>, dismiss_after: Duration) -> Self {
        Self { inner: Arc::default(), delivery, dismiss_after, metrics: Metrics::new() }
    }

    /// Records a change to one field and clears that field's error.
    ///
    /// Returns `false` for names that are not part of the form.
    pub fn set_field(&self, field_name: &str, value: impl Into<String>) -> bool {
        let Some(field) = Field::from_name(field_name) else {
            return false;
        };
        let mut inner = lock(&self.inner);
        inner.payload.set(field, value.into());
        inner.errors.clear(field);
        true
    }

    /// Validates one field against its current value.
    pub fn blur(&self, field_name: &str) -> Option<&'static str> {
        let field = Field::from_name(field_name)?;
        let mut inner = lock(&self.inner);
        let reason = field.check(inner.payload.get(field));
        inner.errors.set(field, reason);
        reason
    }

    #[must_use]
    pub fn snapshot(&self) -> FormSnapshot {
        let inner = lock(&self.inner);
        FormSnapshot { payload: inner.payload.clone(), errors: inner.errors.clone(), state: inner.state.clone() }
    }

    #[must_use]
    pub fn view(&self) -> FeedbackView {
        FeedbackPresenter::render(&self.snapshot(), self.delivery.is_available())
    }

    #[must_use]
    pub fn is_available(&self) -> bool {
        self.delivery.is_available()
    }

    /// Runs one submission attempt to completion.
    ///
    /// The delivery continues in the background if the caller stops waiting,
    /// so the form always leaves `Submitting`.
    #[tracing::instrument(skip(self), fields(attempt = tracing::field::Empty))]
    pub async fn submit(&self) -> SubmitOutcome {
        let (attempt, payload) = {
            let mut inner = lock(&self.inner);
            if inner.closed {
                return SubmitOutcome::Closed;
            }
            if inner.state == SubmissionState::Submitting {
                tracing::debug!("Submit ignored, an attempt is already in flight");
                self.metrics.record("busy");
                return SubmitOutcome::Busy;
            }

            let errors = FieldErrors::validate_all(&inner.payload);
            inner.errors = errors.clone();
            if !errors.is_empty() {
                self.metrics.record("invalid");
                return SubmitOutcome::Invalid(errors);
            }

            inner.dismiss = None;
            inner.attempt += 1;
            inner.state = SubmissionState::Submitting;
            (inner.attempt, inner.payload.trimmed())
        };
        tracing::Span::current().record("attempt", attempt);

        let form = Arc::clone(&self.inner);
        let delivery = Arc::clone(&self.delivery);
        let dismiss_after = self.dismiss_after;
        let task = tokio::spawn(
            async move {
                let state = match AssertUnwindSafe(delivery.deliver(&payload)).catch_unwind().await {
                    Ok(Ok(result)) if result.success => SubmissionState::Success(result.message),
                    Ok(Ok(result)) => SubmissionState::Error(result.message),
                    Ok(Err(e)) => {
                        tracing::error!(error = %e, "Delivery failed unexpectedly");
                        SubmissionState::Error(UNEXPECTED_ERROR_MESSAGE.to_string())
                    }
                    Err(_) => {
                        tracing::error!("Delivery panicked");
                        SubmissionState::Error(UNEXPECTED_ERROR_MESSAGE.to_string())
                    }
                };
                finish(&form, attempt, state.clone(), dismiss_after);
                state
            }
            .in_current_span(),
        );

        let state = match task.await {
            Ok(state) => state,
            Err(e) => {
                tracing::error!(error = %e, "Submission task did not complete");
                SubmissionState::Error(UNEXPECTED_ERROR_MESSAGE.to_string())
            }
        };
        self.metrics.record(if matches!(state, SubmissionState::Success(_)) { "success" } else { "error" });
        SubmitOutcome::Completed(state)
    }

    /// Tears the form down. Pending dismissals are cancelled and any that
    /// still fire afterwards do nothing.
    pub fn close(&self) {
        let mut inner = lock(&self.inner);
        inner.closed = true;
        inner.dismiss = None;
    }
}

impl Drop for ContactForm {
    fn drop(&mut self) {
        self.close();
    }
}

fn finish(form: &Arc<Mutex<FormInner>>, attempt: u64, state: SubmissionState, after: Duration) {
    let mut inner = lock(form);
    if inner.closed {
        return;
    }
    if matches!(state, SubmissionState::Success(_)) {
        inner.payload = SubmissionPayload::default();
    }
    inner.state = state;

    let weak = Arc::downgrade(form);
    inner.dismiss = Some(DismissTimer::schedule(after, move || dismiss(&weak, attempt)));
}

fn dismiss(form: &Weak<Mutex<FormInner>>, attempt: u64) {
    let Some(form) = form.upgrade() else {
        return;
    };
    let mut inner = lock(&form);
    if inner.closed || inner.attempt != attempt {
        return;
    }
    if matches!(inner.state, SubmissionState::Success(_) | SubmissionState::Error(_)) {
        inner.state = SubmissionState::Idle;
        tracing::debug!(attempt, "Notice dismissed");
    }
    // Drop the handle without aborting the task that is running this callback.
    if let Some(timer) = inner.dismiss.take() {
        timer.detach();
    }
}

use crate::domain::contact::{FieldErrors, SubmissionPayload};
use crate::services::submission::{FormSnapshot, SubmissionState};
use serde::Serialize;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::Instrument;

pub const UNCONFIGURED_ADVISORY: &str = "Email service is currently being configured. You can still submit the form, \
     but you may want to contact me directly via social media.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmitControl {
    Ready,
    Busy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

/// Everything the contact form needs to draw itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackView {
    pub control: SubmitControl,
    pub notice: Option<Notice>,
    pub advisory: Option<&'static str>,
    pub field_errors: FieldErrors,
    pub values: SubmissionPayload,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FeedbackPresenter;

impl FeedbackPresenter {
    /// Persistent advisory shown while the relay has no credentials.
    #[must_use]
    pub const fn advisory(service_available: bool) -> Option<&'static str> {
        if service_available { None } else { Some(UNCONFIGURED_ADVISORY) }
    }

    #[must_use]
    pub fn render(snapshot: &FormSnapshot, service_available: bool) -> FeedbackView {
        let (control, notice) = match &snapshot.state {
            SubmissionState::Idle => (SubmitControl::Ready, None),
            SubmissionState::Submitting => (SubmitControl::Busy, None),
            SubmissionState::Success(message) => {
                (SubmitControl::Ready, Some(Notice { kind: NoticeKind::Success, message: message.clone() }))
            }
            SubmissionState::Error(message) => {
                (SubmitControl::Ready, Some(Notice { kind: NoticeKind::Error, message: message.clone() }))
            }
        };

        FeedbackView {
            control,
            notice,
            advisory: Self::advisory(service_available),
            field_errors: snapshot.errors.clone(),
            values: snapshot.payload.clone(),
        }
    }
}

/// A fire-once callback that is aborted when dropped.
#[derive(Debug)]
pub struct DismissTimer {
    task: Option<JoinHandle<()>>,
}

impl DismissTimer {
    pub fn schedule<F>(after: Duration, on_fire: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        let task = tokio::spawn(
            async move {
                tokio::time::sleep(after).await;
                on_fire();
            }
            .instrument(tracing::debug_span!("dismiss_timer", after_ms = after.as_millis())),
        );
        Self { task: Some(task) }
    }

    #[cfg(test)]
    fn is_pending(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Releases the handle without aborting the task.
    pub fn detach(mut self) {
        self.task = None;
    }
}

impl Drop for DismissTimer {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

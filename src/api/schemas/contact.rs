use crate::domain::contact::SubmissionPayload;
use crate::services::feedback::FeedbackView;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct ContactRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: String,
}

impl From<ContactRequest> for SubmissionPayload {
    fn from(req: ContactRequest) -> Self {
        Self { name: req.name, email: req.email, message: req.message }
    }
}

#[derive(Debug, Serialize)]
pub struct ContactStatus {
    pub available: bool,
    pub advisory: Option<&'static str>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldEvent {
    #[default]
    Change,
    Blur,
}

#[derive(Debug, Deserialize)]
pub struct FieldUpdate {
    pub field: String,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub event: FieldEvent,
}

#[derive(Debug, Serialize)]
pub struct SessionCreated {
    pub id: Uuid,
    pub view: FeedbackView,
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub outcome: &'static str,
    pub view: FeedbackView,
}

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectStatus {
    Completed,
    #[serde(rename = "In Progress")]
    InProgress,
    Planning,
}

impl ProjectStatus {
    /// Parses the stored label. Unrecognised labels are treated as `Planning`.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label {
            "Completed" => Self::Completed,
            "In Progress" => Self::InProgress,
            _ => Self::Planning,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Completed => "Completed",
            Self::InProgress => "In Progress",
            Self::Planning => "Planning",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    pub technologies: Vec<String>,
    pub live_url: Option<String>,
    pub github_url: Option<String>,
    pub status: ProjectStatus,
    pub year: String,
    pub featured: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

use crate::domain::project::{Project, ProjectStatus};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, FromRow)]
pub(crate) struct ProjectRecord {
    pub(crate) id: Uuid,
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) image_url: Option<String>,
    pub(crate) technologies: Option<Vec<String>>,
    pub(crate) live_url: Option<String>,
    pub(crate) github_url: Option<String>,
    pub(crate) status: String,
    pub(crate) year: String,
    pub(crate) featured: bool,
    pub(crate) created_at: OffsetDateTime,
    pub(crate) updated_at: OffsetDateTime,
}

impl From<ProjectRecord> for Project {
    fn from(record: ProjectRecord) -> Self {
        Self {
            id: record.id,
            title: record.title,
            description: record.description,
            image_url: record.image_url,
            technologies: record.technologies.unwrap_or_default(),
            live_url: record.live_url,
            github_url: record.github_url,
            status: ProjectStatus::from_label(&record.status),
            year: record.year,
            featured: record.featured,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

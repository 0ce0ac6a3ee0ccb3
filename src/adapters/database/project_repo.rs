use crate::adapters::database::records::ProjectRecord;
use crate::domain::project::Project;
use sqlx::PgConnection;
use uuid::Uuid;

const COLUMNS: &str = "id, title, description, image_url, technologies, live_url, github_url, status, year, \
                       featured, created_at, updated_at";

#[derive(Clone, Debug, Default)]
pub struct ProjectRepository {}

impl ProjectRepository {
    #[must_use]
    pub const fn new() -> Self {
        Self {}
    }

    /// Lists every project, newest first.
    ///
    /// # Errors
    /// Returns `sqlx::Error` if the query fails.
    #[tracing::instrument(level = "debug", skip(self, conn))]
    pub(crate) async fn list_all(&self, conn: &mut PgConnection) -> Result<Vec<Project>, sqlx::Error> {
        let rows = sqlx::query_as::<_, ProjectRecord>(&format!(
            "SELECT {COLUMNS} FROM projects ORDER BY created_at DESC"
        ))
        .fetch_all(conn)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Lists featured projects, newest first.
    ///
    /// # Errors
    /// Returns `sqlx::Error` if the query fails.
    #[tracing::instrument(level = "debug", skip(self, conn))]
    pub(crate) async fn list_featured(&self, conn: &mut PgConnection) -> Result<Vec<Project>, sqlx::Error> {
        let rows = sqlx::query_as::<_, ProjectRecord>(&format!(
            "SELECT {COLUMNS} FROM projects WHERE featured = TRUE ORDER BY created_at DESC"
        ))
        .fetch_all(conn)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Finds a project by its ID.
    ///
    /// # Errors
    /// Returns `sqlx::Error` if the query fails.
    #[tracing::instrument(level = "debug", skip(self, conn))]
    pub(crate) async fn find_by_id(&self, conn: &mut PgConnection, id: Uuid) -> Result<Option<Project>, sqlx::Error> {
        let record =
            sqlx::query_as::<_, ProjectRecord>(&format!("SELECT {COLUMNS} FROM projects WHERE id = $1"))
                .bind(id)
                .fetch_optional(conn)
                .await?;

        Ok(record.map(Into::into))
    }
}

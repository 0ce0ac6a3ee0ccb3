use crate::adapters::database::DbPool;
use crate::adapters::database::project_repo::ProjectRepository;
use crate::domain::project::Project;
use uuid::Uuid;

/// Read-only access to the project store.
///
/// Misconfiguration and query failures are logged and reported as "nothing
/// found"; callers never see an error.
#[derive(Clone, Debug)]
pub struct ProjectService {
    pool: Option<DbPool>,
    repo: ProjectRepository,
}

impl ProjectService {
    #[must_use]
    pub const fn new(pool: Option<DbPool>, repo: ProjectRepository) -> Self {
        Self { pool, repo }
    }

    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.pool.is_some()
    }

    #[tracing::instrument(skip(self))]
    pub async fn list_all(&self) -> Vec<Project> {
        let Some(pool) = &self.pool else {
            return Vec::new();
        };
        let result = match pool.acquire().await {
            Ok(mut conn) => self.repo.list_all(&mut conn).await,
            Err(e) => Err(e),
        };
        result.unwrap_or_else(|e| {
            tracing::error!(error = %e, "Error fetching projects");
            Vec::new()
        })
    }

    #[tracing::instrument(skip(self))]
    pub async fn list_featured(&self) -> Vec<Project> {
        let Some(pool) = &self.pool else {
            return Vec::new();
        };
        let result = match pool.acquire().await {
            Ok(mut conn) => self.repo.list_featured(&mut conn).await,
            Err(e) => Err(e),
        };
        result.unwrap_or_else(|e| {
            tracing::error!(error = %e, "Error fetching featured projects");
            Vec::new()
        })
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_by_id(&self, id: Uuid) -> Option<Project> {
        let pool = self.pool.as_ref()?;
        let result = match pool.acquire().await {
            Ok(mut conn) => self.repo.find_by_id(&mut conn, id).await,
            Err(e) => Err(e),
        };
        result.unwrap_or_else(|e| {
            tracing::error!(error = %e, project_id = %id, "Error fetching project");
            None
        })
    }
}

//! Repository for the `job_artifacts` table.

use sqlx::PgPool;
use uuid::Uuid;
use vigraph_core::artifact::ArtifactContent;
use vigraph_core::types::JobId;

use crate::models::artifact::Artifact;

/// Column list for `job_artifacts` queries.
const COLUMNS: &str = "id, job_id, artifact_type, content, created_at";

/// Provides insert and lookup operations for stage artifacts.
pub struct ArtifactRepo;

impl ArtifactRepo {
    /// Insert the artifact for one `(job, stage)` pair, at most once.
    ///
    /// The unique index on `(job_id, artifact_type)` absorbs redelivered
    /// stage results: the duplicate insert hits `ON CONFLICT DO NOTHING`
    /// and `None` is returned.
    pub async fn insert_once(
        pool: &PgPool,
        job_id: JobId,
        content: &ArtifactContent,
    ) -> Result<Option<Artifact>, sqlx::Error> {
        let query = format!(
            "INSERT INTO job_artifacts (id, job_id, artifact_type, content) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (job_id, artifact_type) DO NOTHING \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Artifact>(&query)
            .bind(Uuid::new_v4())
            .bind(job_id)
            .bind(content.kind().as_str())
            .bind(content.to_value())
            .fetch_optional(pool)
            .await
    }

    /// Find an artifact by its ID.
    pub async fn find_by_id(pool: &PgPool, id: JobId) -> Result<Option<Artifact>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM job_artifacts WHERE id = $1");
        sqlx::query_as::<_, Artifact>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all artifacts for a job, in insertion order.
    pub async fn list_by_job(pool: &PgPool, job_id: JobId) -> Result<Vec<Artifact>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM job_artifacts WHERE job_id = $1 ORDER BY created_at ASC"
        );
        sqlx::query_as::<_, Artifact>(&query)
            .bind(job_id)
            .fetch_all(pool)
            .await
    }
}

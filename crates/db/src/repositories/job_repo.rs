//! Repository for the `jobs` table.
//!
//! Status writes come in exactly two shapes: a compare-and-swap advance
//! keyed on the expected prior status, and a terminal-sticky failure mark.
//! Both report whether a row actually changed, which is how the
//! orchestrator detects redeliveries and late failure events.

use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;
use vigraph_core::status::JobStatus;
use vigraph_core::types::{DbId, JobId};

use crate::models::job::{CreateJob, Job};

/// Column list for `jobs` queries.
const COLUMNS: &str =
    "id, job_type, video_id, user_id, action_models, status, created_at, updated_at";

/// Provides CRUD and status-transition operations for jobs.
pub struct JobRepo;

impl JobRepo {
    /// Insert a new job in `created` status with an app-generated UUID v4.
    ///
    /// Callers are expected to have validated `action_models` against the
    /// job type first; this method persists whatever it is given.
    pub async fn create(pool: &PgPool, input: &CreateJob) -> Result<Job, sqlx::Error> {
        let query = format!(
            "INSERT INTO jobs (id, job_type, video_id, user_id, action_models, status) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Job>(&query)
            .bind(Uuid::new_v4())
            .bind(input.job_type.as_str())
            .bind(&input.video_id)
            .bind(input.user_id)
            .bind(Json(&input.action_models))
            .bind(JobStatus::Created.as_str())
            .fetch_one(pool)
            .await
    }

    /// Find a job by its ID.
    pub async fn find_by_id(pool: &PgPool, id: JobId) -> Result<Option<Job>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM jobs WHERE id = $1");
        sqlx::query_as::<_, Job>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all jobs submitted by one user, newest first.
    pub async fn list_by_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Job>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM jobs WHERE user_id = $1 ORDER BY created_at DESC");
        sqlx::query_as::<_, Job>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Compare-and-swap the job status from `expected` to `next`.
    ///
    /// Returns `false` when the row was not in `expected` status -- the
    /// redelivery guard: a second delivery of the same stage result finds
    /// the status already advanced and must not dispatch again.
    pub async fn advance_status(
        pool: &PgPool,
        id: JobId,
        expected: JobStatus,
        next: JobStatus,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE jobs SET status = $3, updated_at = NOW() \
             WHERE id = $1 AND status = $2",
        )
        .bind(id)
        .bind(expected.as_str())
        .bind(next.as_str())
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Mark a job failed unless it already reached a terminal state.
    ///
    /// Terminal states are sticky: a `job.failed` arriving after
    /// `completed` leaves the row untouched and returns `false`.
    pub async fn mark_failed(pool: &PgPool, id: JobId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE jobs SET status = $2, updated_at = NOW() \
             WHERE id = $1 AND status NOT IN ($3, $4)",
        )
        .bind(id)
        .bind(JobStatus::Failed.as_str())
        .bind(JobStatus::Completed.as_str())
        .bind(JobStatus::Failed.as_str())
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

//! Job entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use vigraph_core::capability::Capability;
use vigraph_core::stage::JobType;
use vigraph_core::status::JobStatus;
use vigraph_core::types::{DbId, JobId, Timestamp};

/// A row from the `jobs` table.
///
/// `status` and `job_type` are TEXT columns decoded through their domain
/// enums, so an unknown string in the table surfaces as a row-decode error
/// instead of flowing silently through the state machine.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Job {
    pub id: JobId,
    #[sqlx(try_from = "String")]
    #[serde(rename = "type")]
    pub job_type: JobType,
    pub video_id: String,
    pub user_id: DbId,
    pub action_models: Json<Vec<Capability>>,
    #[sqlx(try_from = "String")]
    pub status: JobStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for submitting a new job via `POST /jobs`.
///
/// `action_models` entries parse into [`Capability`] values at the
/// deserialization boundary; a malformed entry is a 422 before any domain
/// validation runs.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateJob {
    #[serde(rename = "type")]
    pub job_type: JobType,
    pub video_id: String,
    pub action_models: Vec<Capability>,
    pub user_id: DbId,
}

//! Job artifact entity model.

use serde::Serialize;
use sqlx::FromRow;
use vigraph_core::artifact::ArtifactContent;
use vigraph_core::error::CoreError;
use vigraph_core::stage::Stage;
use vigraph_core::types::{JobId, Timestamp};

/// A row from the `job_artifacts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Artifact {
    pub id: JobId,
    pub job_id: JobId,
    #[sqlx(try_from = "String")]
    pub artifact_type: Stage,
    pub content: serde_json::Value,
    pub created_at: Timestamp,
}

impl Artifact {
    /// Validate and type the stored content against the row's declared
    /// artifact type.
    pub fn typed_content(&self) -> Result<ArtifactContent, CoreError> {
        ArtifactContent::from_parts(self.artifact_type, self.content.clone())
    }
}

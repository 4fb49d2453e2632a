//! Job lifecycle states.
//!
//! Stored as plain strings in `jobs.status`. `summary_finished` is written
//! by no currently-reachable transition but is kept as a named state so the
//! column's vocabulary stays closed.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Lifecycle state of a job. `Completed` and `Failed` are absorbing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum JobStatus {
    Created,
    TranscriptionFinished,
    SummaryFinished,
    EntityRelationFinished,
    Completed,
    Failed,
}

impl JobStatus {
    /// The string stored in the database and carried in
    /// `job.status_updated` events.
    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Created => "created",
            JobStatus::TranscriptionFinished => "transcription_finished",
            JobStatus::SummaryFinished => "summary_finished",
            JobStatus::EntityRelationFinished => "entity-relation_finished",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }

    /// Whether no further transitions are accepted from this state.
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created" => Ok(JobStatus::Created),
            "transcription_finished" => Ok(JobStatus::TranscriptionFinished),
            "summary_finished" => Ok(JobStatus::SummaryFinished),
            "entity-relation_finished" => Ok(JobStatus::EntityRelationFinished),
            "completed" => Ok(JobStatus::Completed),
            "failed" => Ok(JobStatus::Failed),
            other => Err(CoreError::Internal(format!("Unknown job status: {other}"))),
        }
    }
}

impl TryFrom<String> for JobStatus {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<JobStatus> for String {
    fn from(value: JobStatus) -> Self {
        value.as_str().to_string()
    }
}

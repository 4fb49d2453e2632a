//! The job lifecycle state machine as a pure lookup.
//!
//! Each row pairs the expected prior status with the status to write, so
//! every advance is a compare-and-swap: a redelivered stage result finds
//! the job already past its expected status and is dropped without a
//! second dispatch. `completed` and `failed` are absorbing -- no row maps
//! out of them.

use vigraph_core::stage::{JobType, Stage};
use vigraph_core::status::JobStatus;

/// What the orchestrator publishes after a status advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Followup {
    /// Publish the next stage's request to the job's first matching
    /// capability for this stage.
    Dispatch(Stage),
    /// Publish `job.completed`.
    Complete,
}

/// One row of the transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// Status the job must currently hold for the event to apply.
    pub expected: JobStatus,
    /// Status written on a successful compare-and-swap.
    pub next: JobStatus,
    pub followup: Followup,
}

/// Look up the transition for a `result_stage` result arriving for a job
/// of `job_type`. `None` means the event is not part of this job type's
/// path and the message is dropped.
pub fn transition_for(job_type: JobType, result_stage: Stage) -> Option<Transition> {
    use Followup::{Complete, Dispatch};
    use JobStatus::{Created, EntityRelationFinished, TranscriptionFinished};

    let row = match (job_type, result_stage) {
        (JobType::Transcription, Stage::Transcription) => Transition {
            expected: Created,
            next: JobStatus::Completed,
            followup: Complete,
        },
        (JobType::Summary, Stage::Transcription) => Transition {
            expected: Created,
            next: TranscriptionFinished,
            followup: Dispatch(Stage::Summary),
        },
        (JobType::Summary, Stage::Summary) => Transition {
            expected: TranscriptionFinished,
            next: JobStatus::Completed,
            followup: Complete,
        },
        (JobType::Graph, Stage::Transcription) => Transition {
            expected: Created,
            next: TranscriptionFinished,
            followup: Dispatch(Stage::EntityRelation),
        },
        (JobType::Graph, Stage::EntityRelation) => Transition {
            expected: TranscriptionFinished,
            next: EntityRelationFinished,
            followup: Dispatch(Stage::Graph),
        },
        (JobType::Graph, Stage::Graph) => Transition {
            expected: EntityRelationFinished,
            next: JobStatus::Completed,
            followup: Complete,
        },
        _ => return None,
    };
    Some(row)
}

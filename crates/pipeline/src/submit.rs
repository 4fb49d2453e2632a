//! Job creation: validate, persist, dispatch the first stage.

use vigraph_broker::messages::TranscriptionRequest;
use vigraph_broker::{publish_json, Publisher};
use vigraph_db::models::job::{CreateJob, Job};
use vigraph_db::repositories::JobRepo;
use vigraph_db::DbPool;

use crate::router;
use crate::PipelineError;

/// Create a job and publish its transcription request.
///
/// Validation runs BEFORE the insert: a request missing a required
/// capability is rejected without leaving an orphan `created` row behind.
pub async fn submit_job(
    pool: &DbPool,
    publisher: &dyn Publisher,
    input: &CreateJob,
) -> Result<Job, PipelineError> {
    let transcription = router::validate_action_models(input.job_type, &input.action_models)?;
    let routing_key = transcription.routing_key();

    let job = JobRepo::create(pool, input).await?;

    publish_json(
        publisher,
        &routing_key,
        &TranscriptionRequest {
            job_id: job.id,
            video_id: job.video_id.clone(),
        },
    )
    .await?;

    tracing::info!(job_id = %job.id, capability = %routing_key, "Published transcription request");
    Ok(job)
}

//! Failure sentinel for stage handlers.
//!
//! Applied uniformly around every worker-side handler. A handler error
//! becomes a `job.failed` event for the job named in the inbound payload;
//! by default the error is then suppressed so the broker does not keep
//! redelivering a poisoned message. When the payload carries no `job_id`
//! there is nothing to fail -- the job stays stuck in its prior state and
//! all we can do is log.

use std::future::Future;

use vigraph_broker::messages::{subjects, JobFailed};
use vigraph_broker::{publish_json, Publisher};
use vigraph_core::types::JobId;

use crate::WorkerError;

/// What to do with a handler error after `job.failed` is published.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureMode {
    /// Swallow the error so the message is not redelivered (default).
    Suppress,
    /// Re-raise after publishing, for deployments that prefer
    /// broker-level dead-lettering.
    Propagate,
}

/// Pull the well-known `job_id` field out of a raw message payload.
pub fn extract_job_id(payload: &[u8]) -> Option<JobId> {
    let value: serde_json::Value = serde_json::from_slice(payload).ok()?;
    value.get("job_id")?.as_str()?.parse().ok()
}

/// Run `handler`; on error, publish `job.failed` for the payload's job.
pub async fn guard<F>(
    publisher: &dyn Publisher,
    payload: &[u8],
    mode: FailureMode,
    handler: F,
) -> Result<(), WorkerError>
where
    F: Future<Output = Result<(), WorkerError>>,
{
    let Err(error) = handler.await else {
        return Ok(());
    };

    match extract_job_id(payload) {
        Some(job_id) => {
            tracing::error!(%job_id, error = %error, "Job failed");
            if let Err(publish_err) =
                publish_json(publisher, subjects::JOB_FAILED, &JobFailed { id: job_id }).await
            {
                tracing::error!(%job_id, error = %publish_err, "Could not publish job.failed");
            }
        }
        None => {
            tracing::error!(error = %error, "Job failed and payload carries no job_id");
        }
    }

    match mode {
        FailureMode::Suppress => Ok(()),
        FailureMode::Propagate => Err(error),
    }
}

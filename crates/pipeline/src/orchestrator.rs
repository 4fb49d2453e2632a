//! Broker-driven orchestrator.
//!
//! Consumes the four `<stage>.result` subjects plus `job.failed` and
//! `model.available`. Every inbound message is handled in its own spawned
//! task; all shared state lives in the database. Redeliveries are absorbed
//! by the status compare-and-swap and the artifact unique index, so a
//! duplicated result neither double-dispatches nor double-inserts.

use std::sync::Arc;

use bytes::Bytes;
use futures::StreamExt;
use tokio_util::sync::CancellationToken;
use vigraph_broker::messages::{
    subjects, EntityRelationRequest, GraphRequest, JobCompleted, JobFailed, JobStatusUpdated,
    ModelAvailable, StageResult, SummaryRequest,
};
use vigraph_broker::{publish_json, Broker, Publisher, Subscriber};
use vigraph_core::artifact::ArtifactContent;
use vigraph_core::error::CoreError;
use vigraph_core::stage::Stage;
use vigraph_core::status::JobStatus;
use vigraph_db::models::job::Job;
use vigraph_db::repositories::{ArtifactRepo, JobRepo, RegistryRepo};
use vigraph_db::DbPool;

use crate::transition::{transition_for, Followup, Transition};
use crate::{router, PipelineError};

/// What a consumer loop is subscribed for.
#[derive(Debug, Clone, Copy)]
enum Inbound {
    StageResult(Stage),
    JobFailed,
    ModelAvailable,
}

/// Shared handler context; cheap to clone into spawned tasks.
#[derive(Clone)]
struct Ctx {
    pool: DbPool,
    publisher: Arc<dyn Publisher>,
}

/// The pipeline state machine's consuming side.
pub struct Orchestrator {
    broker: Broker,
    ctx: Ctx,
}

impl Orchestrator {
    pub fn new(pool: DbPool, broker: Broker) -> Self {
        let publisher: Arc<dyn Publisher> = Arc::new(broker.clone());
        Self {
            broker,
            ctx: Ctx { pool, publisher },
        }
    }

    /// Subscribe to all orchestrator subjects and consume until `cancel`
    /// is triggered.
    pub async fn run(self, cancel: CancellationToken) -> Result<(), PipelineError> {
        let mut tasks = Vec::new();

        for stage in Stage::ALL {
            let subject = subjects::stage_result(stage);
            let sub = self
                .broker
                .queue_subscribe(&subject, subjects::ORCHESTRATOR_GROUP)
                .await?;
            tasks.push(tokio::spawn(consume(
                sub,
                subject,
                Inbound::StageResult(stage),
                self.ctx.clone(),
                cancel.clone(),
            )));
        }

        for (subject, kind) in [
            (subjects::JOB_FAILED, Inbound::JobFailed),
            (subjects::MODEL_AVAILABLE, Inbound::ModelAvailable),
        ] {
            let sub = self
                .broker
                .queue_subscribe(subject, subjects::ORCHESTRATOR_GROUP)
                .await?;
            tasks.push(tokio::spawn(consume(
                sub,
                subject.to_string(),
                kind,
                self.ctx.clone(),
                cancel.clone(),
            )));
        }

        tracing::info!("Orchestrator consumers started");
        futures::future::join_all(tasks).await;
        tracing::info!("Orchestrator shut down");
        Ok(())
    }
}

/// One consumer loop: pull messages off a subscription and hand each to
/// its own task.
async fn consume(
    mut sub: Subscriber,
    subject: String,
    kind: Inbound,
    ctx: Ctx,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!(%subject, "Consumer shutting down");
                break;
            }
            message = sub.next() => {
                let Some(message) = message else {
                    tracing::warn!(%subject, "Subscription closed");
                    break;
                };
                let ctx = ctx.clone();
                let subject = subject.clone();
                tokio::spawn(async move {
                    if let Err(e) = handle(&ctx, kind, message.payload).await {
                        tracing::error!(%subject, error = %e, "Message handling failed");
                    }
                });
            }
        }
    }
}

/// Decode and apply one inbound message.
async fn handle(ctx: &Ctx, kind: Inbound, payload: Bytes) -> Result<(), PipelineError> {
    match kind {
        Inbound::StageResult(Stage::Transcription) => {
            let msg: StageResult<_> = serde_json::from_slice(&payload)?;
            apply_result(ctx, Stage::Transcription, msg.job_id, ArtifactContent::Transcription(msg.result)).await
        }
        Inbound::StageResult(Stage::Summary) => {
            let msg: StageResult<_> = serde_json::from_slice(&payload)?;
            apply_result(ctx, Stage::Summary, msg.job_id, ArtifactContent::Summary(msg.result)).await
        }
        Inbound::StageResult(Stage::EntityRelation) => {
            let msg: StageResult<_> = serde_json::from_slice(&payload)?;
            apply_result(ctx, Stage::EntityRelation, msg.job_id, ArtifactContent::EntityRelation(msg.result)).await
        }
        Inbound::StageResult(Stage::Graph) => {
            let msg: StageResult<_> = serde_json::from_slice(&payload)?;
            apply_result(ctx, Stage::Graph, msg.job_id, ArtifactContent::Graph(msg.result)).await
        }
        Inbound::JobFailed => {
            let msg: JobFailed = serde_json::from_slice(&payload)?;
            apply_failure(ctx, msg).await
        }
        Inbound::ModelAvailable => {
            let msg: ModelAvailable = serde_json::from_slice(&payload)?;
            RegistryRepo::heartbeat(&ctx.pool, &msg.model_name).await?;
            tracing::debug!(model = %msg.model_name, "Heartbeat recorded");
            Ok(())
        }
    }
}

/// Apply one stage result: persist the artifact, advance status, emit the
/// status fanout, then dispatch the follow-up.
async fn apply_result(
    ctx: &Ctx,
    stage: Stage,
    job_id: uuid::Uuid,
    content: ArtifactContent,
) -> Result<(), PipelineError> {
    let Some(job) = JobRepo::find_by_id(&ctx.pool, job_id).await? else {
        tracing::warn!(%job_id, %stage, "Result for unknown job, dropping");
        return Ok(());
    };

    let Some(transition) = transition_for(job.job_type, stage) else {
        tracing::warn!(%job_id, job_type = %job.job_type, %stage, "Result not on this job's path, dropping");
        return Ok(());
    };

    // The artifact goes in before the status write. Both are idempotent,
    // so a crash between the two is recovered by the broker redelivery:
    // the duplicate insert is absorbed and the CAS still advances. The
    // reverse order would drop the redelivery as stale with no artifact.
    if let Some(artifact) = ArtifactRepo::insert_once(&ctx.pool, job.id, &content).await? {
        tracing::info!(%job_id, artifact_id = %artifact.id, %stage, "Artifact stored");
    }

    let advanced =
        JobRepo::advance_status(&ctx.pool, job.id, transition.expected, transition.next).await?;
    finish_transition(ctx.publisher.as_ref(), &job, transition, &content, advanced).await
}

/// Publish side of a stage-result application, gated on the status
/// compare-and-swap outcome. `advanced == false` means a redelivery or an
/// out-of-order result found the job past its expected status; dispatching
/// again would fan the next stage out twice, so nothing is published.
async fn finish_transition(
    publisher: &dyn Publisher,
    job: &Job,
    transition: Transition,
    content: &ArtifactContent,
    advanced: bool,
) -> Result<(), PipelineError> {
    if !advanced {
        tracing::info!(job_id = %job.id, status = %job.status, "Stale or duplicate result, dropping");
        return Ok(());
    }

    publish_status(publisher, job, transition.next).await?;
    tracing::info!(job_id = %job.id, status = %transition.next, "Job status updated");

    publish_followup(publisher, job, transition.followup, content).await
}

/// Apply a `job.failed` event. Terminal states are sticky: a failure
/// arriving after completion changes nothing and emits nothing.
async fn apply_failure(ctx: &Ctx, msg: JobFailed) -> Result<(), PipelineError> {
    let Some(job) = JobRepo::find_by_id(&ctx.pool, msg.id).await? else {
        tracing::warn!(job_id = %msg.id, "Failure event for unknown job, dropping");
        return Ok(());
    };

    if JobRepo::mark_failed(&ctx.pool, job.id).await? {
        tracing::error!(job_id = %job.id, "Job failed");
        publish_status(ctx.publisher.as_ref(), &job, JobStatus::Failed).await?;
    } else {
        tracing::info!(job_id = %job.id, status = %job.status, "Failure event for terminal job, ignoring");
    }
    Ok(())
}

/// Emit the `job.status_updated` fanout for a status write.
async fn publish_status(
    publisher: &dyn Publisher,
    job: &Job,
    status: JobStatus,
) -> Result<(), PipelineError> {
    publish_json(
        publisher,
        subjects::JOB_STATUS_UPDATED,
        &JobStatusUpdated {
            id: job.id,
            video_id: job.video_id.clone(),
            status,
            user_id: job.user_id,
        },
    )
    .await?;
    Ok(())
}

/// Publish the follow-up for an applied transition: either the next
/// stage's request (to the job's first matching capability) or the
/// terminal `job.completed` event.
async fn publish_followup(
    publisher: &dyn Publisher,
    job: &Job,
    followup: Followup,
    content: &ArtifactContent,
) -> Result<(), PipelineError> {
    match followup {
        Followup::Complete => {
            publish_json(
                publisher,
                subjects::JOB_COMPLETED,
                &JobCompleted {
                    id: job.id,
                    job_type: job.job_type,
                    video_id: job.video_id.clone(),
                    user_id: job.user_id,
                },
            )
            .await?;
            tracing::info!(job_id = %job.id, "Job completed");
            Ok(())
        }
        Followup::Dispatch(next_stage) => {
            let capability = router::require_match(next_stage, &job.action_models.0)?;
            let routing_key = capability.routing_key();

            match (next_stage, content) {
                (Stage::Summary, ArtifactContent::Transcription(chunks)) => {
                    publish_json(
                        publisher,
                        &routing_key,
                        &SummaryRequest {
                            job_id: job.id,
                            video_id: job.video_id.clone(),
                            transcription: chunks.clone(),
                        },
                    )
                    .await?;
                }
                (Stage::EntityRelation, ArtifactContent::Transcription(chunks)) => {
                    publish_json(
                        publisher,
                        &routing_key,
                        &EntityRelationRequest {
                            job_id: job.id,
                            video_id: job.video_id.clone(),
                            transcription: chunks.clone(),
                        },
                    )
                    .await?;
                }
                (Stage::Graph, ArtifactContent::EntityRelation(relations)) => {
                    publish_json(
                        publisher,
                        &routing_key,
                        &GraphRequest {
                            job_id: job.id,
                            video_id: job.video_id.clone(),
                            entity_relations: relations.clone(),
                        },
                    )
                    .await?;
                }
                (stage, content) => {
                    return Err(PipelineError::Core(CoreError::Internal(format!(
                        "No request shape for {stage} fed by a {} artifact",
                        content.kind()
                    ))));
                }
            }

            tracing::info!(job_id = %job.id, capability = %routing_key, "Published {next_stage} request");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use sqlx::types::Json;
    use std::sync::Mutex;
    use vigraph_core::artifact::{EntityRelationResult, GraphResult, TranscriptionChunk};
    use vigraph_core::stage::JobType;

    /// Captures published messages instead of talking to a broker.
    #[derive(Default)]
    struct MemoryPublisher {
        sent: Mutex<Vec<(String, serde_json::Value)>>,
    }

    impl MemoryPublisher {
        fn subjects(&self) -> Vec<String> {
            self.sent.lock().unwrap().iter().map(|(s, _)| s.clone()).collect()
        }
    }

    #[async_trait]
    impl Publisher for MemoryPublisher {
        async fn publish(
            &self,
            subject: &str,
            payload: Vec<u8>,
        ) -> Result<(), vigraph_broker::BrokerError> {
            let value = serde_json::from_slice(&payload).unwrap();
            self.sent.lock().unwrap().push((subject.to_string(), value));
            Ok(())
        }
    }

    fn graph_job() -> Job {
        let now = chrono::Utc::now();
        Job {
            id: uuid::Uuid::new_v4(),
            job_type: JobType::Graph,
            video_id: "abc123".into(),
            user_id: 7,
            action_models: Json(vec![
                "transcription.x".parse().unwrap(),
                "entity-relation.y".parse().unwrap(),
                "graph.z".parse().unwrap(),
            ]),
            status: JobStatus::Created,
            created_at: now,
            updated_at: now,
        }
    }

    fn chunks() -> ArtifactContent {
        ArtifactContent::Transcription(vec![TranscriptionChunk {
            text: "hello".into(),
            start_time_ms: 0,
            end_time_ms: 100,
        }])
    }

    #[tokio::test]
    async fn graph_job_dispatch_order_follows_the_pipeline() {
        let publisher = MemoryPublisher::default();
        let job = graph_job();

        // transcription.result -> entity-relation request
        let t = transition_for(JobType::Graph, Stage::Transcription).unwrap();
        publish_followup(&publisher, &job, t.followup, &chunks())
            .await
            .unwrap();

        // entity-relation.result -> graph request
        let er = ArtifactContent::EntityRelation(EntityRelationResult {
            entities: vec![],
            relationships: vec![],
        });
        let t = transition_for(JobType::Graph, Stage::EntityRelation).unwrap();
        publish_followup(&publisher, &job, t.followup, &er)
            .await
            .unwrap();

        // graph.result -> job.completed
        let g = ArtifactContent::Graph(GraphResult {
            nodes: vec![],
            relations: vec![],
        });
        let t = transition_for(JobType::Graph, Stage::Graph).unwrap();
        publish_followup(&publisher, &job, t.followup, &g)
            .await
            .unwrap();

        assert_eq!(
            publisher.subjects(),
            vec!["entity-relation.y", "graph.z", "job.completed"]
        );
    }

    #[tokio::test]
    async fn redelivered_result_dispatches_exactly_once() {
        let publisher = MemoryPublisher::default();
        let job = graph_job();
        let t = transition_for(JobType::Graph, Stage::Transcription).unwrap();

        // First delivery wins the status compare-and-swap and dispatches.
        finish_transition(&publisher, &job, t, &chunks(), true)
            .await
            .unwrap();
        // The redelivery finds the status already advanced and must not
        // dispatch the next stage a second time.
        finish_transition(&publisher, &job, t, &chunks(), false)
            .await
            .unwrap();

        let sent = publisher.subjects();
        assert_eq!(
            sent,
            vec![subjects::JOB_STATUS_UPDATED, "entity-relation.y"],
            "one fanout and one dispatch, nothing from the redelivery"
        );
        assert_eq!(sent.iter().filter(|s| *s == "entity-relation.y").count(), 1);
    }

    #[tokio::test]
    async fn followup_requests_carry_upstream_payloads() {
        let publisher = MemoryPublisher::default();
        let job = graph_job();

        let t = transition_for(JobType::Graph, Stage::Transcription).unwrap();
        publish_followup(&publisher, &job, t.followup, &chunks())
            .await
            .unwrap();

        let sent = publisher.sent.lock().unwrap();
        let (subject, payload) = &sent[0];
        assert_eq!(subject, "entity-relation.y");
        assert_eq!(payload["job_id"], serde_json::json!(job.id));
        assert_eq!(payload["transcription"][0]["text"], "hello");
    }

    #[tokio::test]
    async fn status_fanout_carries_the_new_status() {
        let publisher = MemoryPublisher::default();
        let job = graph_job();

        publish_status(&publisher, &job, JobStatus::TranscriptionFinished)
            .await
            .unwrap();

        let sent = publisher.sent.lock().unwrap();
        let (subject, payload) = &sent[0];
        assert_eq!(subject, subjects::JOB_STATUS_UPDATED);
        assert_eq!(payload["status"], "transcription_finished");
        assert_eq!(payload["user_id"], 7);
    }

    #[tokio::test]
    async fn mismatched_followup_payload_is_an_internal_error() {
        let publisher = MemoryPublisher::default();
        let job = graph_job();

        // A graph request cannot be built from transcription chunks.
        let err = publish_followup(&publisher, &job, Followup::Dispatch(Stage::Graph), &chunks())
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::Core(CoreError::Internal(_))));
        assert!(publisher.subjects().is_empty());
    }
}

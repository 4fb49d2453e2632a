//! Wire contracts for every message that crosses the broker.
//!
//! Stage *requests* are published to the selected capability's routing key
//! (e.g. `summary.local-ollama`); stage *results* and lifecycle events go
//! to the fixed subjects in [`subjects`].

use serde::{Deserialize, Serialize};
use vigraph_core::artifact::{EntityRelationResult, TranscriptionChunk};
use vigraph_core::stage::{JobType, Stage};
use vigraph_core::status::JobStatus;
use vigraph_core::types::{DbId, JobId};

/// Fixed subject names (everything except capability routing keys).
pub mod subjects {
    use vigraph_core::stage::Stage;

    /// Capability heartbeat, republished every 10s per advertised capability.
    pub const MODEL_AVAILABLE: &str = "model.available";

    /// Terminal success signal.
    pub const JOB_COMPLETED: &str = "job.completed";

    /// Failure signal, published by the worker-side failure sentinel.
    pub const JOB_FAILED: &str = "job.failed";

    /// Status fanout emitted after every status write.
    pub const JOB_STATUS_UPDATED: &str = "job.status_updated";

    /// Queue group shared by orchestrator instances so each inbound
    /// message is consumed once.
    pub const ORCHESTRATOR_GROUP: &str = "orchestrator";

    /// The fixed per-stage result subject, e.g. `transcription.result`.
    pub fn stage_result(stage: Stage) -> String {
        format!("{stage}.result")
    }
}

/// Heartbeat payload on `model.available`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelAvailable {
    pub model_name: String,
}

/// First-stage request, published to the selected transcription capability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionRequest {
    pub job_id: JobId,
    pub video_id: String,
}

/// Summary request; carries the upstream transcription chunks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryRequest {
    pub job_id: JobId,
    pub video_id: String,
    pub transcription: Vec<TranscriptionChunk>,
}

/// Entity-relation request; carries the upstream transcription chunks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityRelationRequest {
    pub job_id: JobId,
    pub video_id: String,
    pub transcription: Vec<TranscriptionChunk>,
}

/// Graph-layout request; carries the upstream entity-relation output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphRequest {
    pub job_id: JobId,
    pub video_id: String,
    pub entity_relations: EntityRelationResult,
}

/// Envelope for every `<stage>.result` message: `{job_id, result}` where
/// the result shape is stage-specific.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageResult<T> {
    pub job_id: JobId,
    pub result: T,
}

/// Terminal success event on `job.completed`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobCompleted {
    pub id: JobId,
    #[serde(rename = "type")]
    pub job_type: JobType,
    pub video_id: String,
    pub user_id: DbId,
}

/// Failure event on `job.failed`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobFailed {
    pub id: JobId,
}

/// Status fanout event on `job.status_updated`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobStatusUpdated {
    pub id: JobId,
    pub video_id: String,
    pub status: JobStatus,
    pub user_id: DbId,
}

#[cfg(test)]
mod tests {
    use super::*;
    use vigraph_core::artifact::{Entity, Relationship};

    #[test]
    fn result_subjects_match_stage_wire_names() {
        assert_eq!(subjects::stage_result(Stage::Transcription), "transcription.result");
        assert_eq!(subjects::stage_result(Stage::EntityRelation), "entity-relation.result");
    }

    #[test]
    fn stage_result_envelope_decodes_transcription_payload() {
        let raw = serde_json::json!({
            "job_id": "b4b9ee2e-9a83-4e28-9f3b-4a4c27702419",
            "result": [
                {"text": "hi", "start_time_ms": 0, "end_time_ms": 900}
            ]
        });
        let msg: StageResult<Vec<TranscriptionChunk>> =
            serde_json::from_value(raw).unwrap();
        assert_eq!(msg.result.len(), 1);
        assert_eq!(msg.result[0].text, "hi");
    }

    #[test]
    fn job_completed_serializes_type_under_legacy_key() {
        let msg = JobCompleted {
            id: uuid::Uuid::nil(),
            job_type: JobType::Graph,
            video_id: "v".into(),
            user_id: 1,
        };
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["type"], "graph");
    }

    #[test]
    fn graph_request_carries_entity_relations() {
        let msg = GraphRequest {
            job_id: uuid::Uuid::nil(),
            video_id: "v".into(),
            entity_relations: EntityRelationResult {
                entities: vec![Entity {
                    name: "acme".into(),
                    chunk_start_time_ms: 0,
                    chunk_end_time_ms: 100,
                }],
                relationships: vec![Relationship {
                    source_entity: "acme".into(),
                    target_entity: "initech".into(),
                    description: "bought".into(),
                    chunk_start_time_ms: 0,
                    chunk_end_time_ms: 100,
                }],
            },
        };
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["entity_relations"]["entities"][0]["name"], "acme");
    }
}

//! Typed artifact payloads.
//!
//! The `job_artifacts.content` column is JSONB whose shape depends on the
//! artifact type. [`ArtifactContent`] is the tagged union of those shapes;
//! the tag lives in the `artifact_type` column, not inside the JSON, so the
//! wire payloads stay identical to what workers publish.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::stage::Stage;

/// One transcribed span of the source audio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptionChunk {
    pub text: String,
    pub start_time_ms: i64,
    pub end_time_ms: i64,
}

/// Summary of one transcription chunk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryChunk {
    pub text: String,
    pub start_time_ms: i64,
    pub end_time_ms: i64,
}

/// A named entity mentioned in the transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub name: String,
    pub chunk_start_time_ms: i64,
    pub chunk_end_time_ms: i64,
}

/// A directed relationship between two entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub source_entity: String,
    pub target_entity: String,
    pub description: String,
    pub chunk_start_time_ms: i64,
    pub chunk_end_time_ms: i64,
}

/// Output of the entity-relation stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRelationResult {
    pub entities: Vec<Entity>,
    pub relationships: Vec<Relationship>,
}

/// A positioned node of the laid-out graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub name: String,
    pub pos_x: f64,
    pub pos_y: f64,
}

/// An edge of the laid-out graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphRelation {
    pub description: String,
    pub source_node: String,
    pub target_node: String,
}

/// Output of the graph-layout stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphResult {
    pub nodes: Vec<GraphNode>,
    pub relations: Vec<GraphRelation>,
}

/// The persisted output of one completed stage for one job.
#[derive(Debug, Clone, PartialEq)]
pub enum ArtifactContent {
    Transcription(Vec<TranscriptionChunk>),
    Summary(Vec<SummaryChunk>),
    EntityRelation(EntityRelationResult),
    Graph(GraphResult),
}

impl ArtifactContent {
    /// The stage that produced this content; its wire name is the
    /// `artifact_type` column value.
    pub fn kind(&self) -> Stage {
        match self {
            ArtifactContent::Transcription(_) => Stage::Transcription,
            ArtifactContent::Summary(_) => Stage::Summary,
            ArtifactContent::EntityRelation(_) => Stage::EntityRelation,
            ArtifactContent::Graph(_) => Stage::Graph,
        }
    }

    /// Serialize the bare payload for the JSONB column.
    pub fn to_value(&self) -> serde_json::Value {
        // These payload types serialize infallibly (no maps with non-string
        // keys, no non-finite floats produced by us).
        match self {
            ArtifactContent::Transcription(chunks) => serde_json::json!(chunks),
            ArtifactContent::Summary(chunks) => serde_json::json!(chunks),
            ArtifactContent::EntityRelation(result) => serde_json::json!(result),
            ArtifactContent::Graph(result) => serde_json::json!(result),
        }
    }

    /// Reconstruct typed content from a stored `(artifact_type, content)`
    /// pair, validating the JSON shape once at the store boundary.
    pub fn from_parts(kind: Stage, content: serde_json::Value) -> Result<Self, CoreError> {
        let parsed = match kind {
            Stage::Transcription => {
                serde_json::from_value(content).map(ArtifactContent::Transcription)
            }
            Stage::Summary => serde_json::from_value(content).map(ArtifactContent::Summary),
            Stage::EntityRelation => {
                serde_json::from_value(content).map(ArtifactContent::EntityRelation)
            }
            Stage::Graph => serde_json::from_value(content).map(ArtifactContent::Graph),
        };
        parsed.map_err(|e| {
            CoreError::Internal(format!("Malformed {kind} artifact content: {e}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn sample_chunks() -> Vec<TranscriptionChunk> {
        vec![TranscriptionChunk {
            text: "hello".into(),
            start_time_ms: 0,
            end_time_ms: 1500,
        }]
    }

    #[test]
    fn transcription_content_survives_store_boundary() {
        let content = ArtifactContent::Transcription(sample_chunks());
        let value = content.to_value();
        let back = ArtifactContent::from_parts(Stage::Transcription, value).unwrap();
        assert_eq!(back, content);
    }

    #[test]
    fn content_is_validated_against_the_declared_kind() {
        // A chunk list is not a valid entity-relation payload.
        let value = ArtifactContent::Transcription(sample_chunks()).to_value();
        assert_matches!(
            ArtifactContent::from_parts(Stage::EntityRelation, value),
            Err(CoreError::Internal(_))
        );
    }

    #[test]
    fn graph_payload_keeps_node_positions() {
        let content = ArtifactContent::Graph(GraphResult {
            nodes: vec![GraphNode {
                name: "acme".into(),
                pos_x: 0.25,
                pos_y: -1.5,
            }],
            relations: vec![GraphRelation {
                description: "acquired".into(),
                source_node: "acme".into(),
                target_node: "initech".into(),
            }],
        });
        let value = content.to_value();
        assert_eq!(value["nodes"][0]["pos_x"], 0.25);
        let back = ArtifactContent::from_parts(Stage::Graph, value).unwrap();
        assert_eq!(back.kind(), Stage::Graph);
        assert_eq!(back, content);
    }
}

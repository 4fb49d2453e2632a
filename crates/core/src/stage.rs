//! Pipeline stage and job type vocabulary.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// One pipeline phase. The wire name of each stage (hyphenated for
/// `entity-relation`) doubles as the capability prefix and the artifact
/// type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    Transcription,
    Summary,
    EntityRelation,
    Graph,
}

impl Stage {
    /// All stages, in pipeline order.
    pub const ALL: [Stage; 4] = [
        Stage::Transcription,
        Stage::Summary,
        Stage::EntityRelation,
        Stage::Graph,
    ];

    /// The wire name used as capability prefix, artifact type, and in
    /// result-queue names.
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Transcription => "transcription",
            Stage::Summary => "summary",
            Stage::EntityRelation => "entity-relation",
            Stage::Graph => "graph",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stage {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "transcription" => Ok(Stage::Transcription),
            "summary" => Ok(Stage::Summary),
            "entity-relation" => Ok(Stage::EntityRelation),
            "graph" => Ok(Stage::Graph),
            other => Err(CoreError::Validation(format!("Unknown stage: {other}"))),
        }
    }
}

impl TryFrom<String> for Stage {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// The kind of pipeline a job runs. Determines which stages execute and
/// which capabilities must be declared at creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobType {
    /// Transcription only.
    Transcription,
    /// Transcription, then summary.
    Summary,
    /// Transcription, then entity-relation extraction, then graph layout.
    Graph,
}

impl JobType {
    pub fn as_str(self) -> &'static str {
        match self {
            JobType::Transcription => "transcription",
            JobType::Summary => "summary",
            JobType::Graph => "graph",
        }
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "transcription" => Ok(JobType::Transcription),
            "summary" => Ok(JobType::Summary),
            "graph" => Ok(JobType::Graph),
            other => Err(CoreError::Validation(format!("Incorrect job type: {other}"))),
        }
    }
}

impl TryFrom<String> for JobType {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_wire_names_round_trip() {
        for stage in Stage::ALL {
            assert_eq!(stage.as_str().parse::<Stage>().unwrap(), stage);
        }
    }

    #[test]
    fn entity_relation_is_hyphenated() {
        assert_eq!(Stage::EntityRelation.as_str(), "entity-relation");
        assert_eq!(
            serde_json::to_string(&Stage::EntityRelation).unwrap(),
            "\"entity-relation\""
        );
    }

    #[test]
    fn unknown_job_type_is_rejected() {
        assert!("embedding".parse::<JobType>().is_err());
    }
}

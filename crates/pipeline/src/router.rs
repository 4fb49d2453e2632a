//! Capability selection and per-type completeness validation.
//!
//! A job declares an ordered `action_models` list; for each stage the
//! first entry with that stage prefix wins. The capability registry is
//! deliberately NOT consulted here -- a job may name a capability with no
//! live worker, in which case dispatch stalls until one appears.

use vigraph_core::capability::Capability;
use vigraph_core::error::CoreError;
use vigraph_core::stage::{JobType, Stage};

/// First capability in `action_models` (original list order) for `stage`,
/// or `None` when the stage is not declared. Pure, order-preserving, O(n).
pub fn first_match(stage: Stage, action_models: &[Capability]) -> Option<&Capability> {
    action_models.iter().find(|c| c.stage == stage)
}

/// As [`first_match`], but a missing stage is a validation error naming
/// the absent prefix.
pub fn require_match(
    stage: Stage,
    action_models: &[Capability],
) -> Result<&Capability, CoreError> {
    first_match(stage, action_models)
        .ok_or_else(|| CoreError::Validation(format!("No valid {stage} model specified")))
}

/// Validate `action_models` completeness for `job_type` at creation time.
///
/// Every pipeline starts with transcription, so that capability is
/// required for all types and returned as the first dispatch target.
/// Check order is transcription, then the type-named stage, then
/// entity-relation for graph jobs -- which intentionally differs from
/// dispatch order (graph jobs dispatch entity-relation before graph).
pub fn validate_action_models(
    job_type: JobType,
    action_models: &[Capability],
) -> Result<&Capability, CoreError> {
    let transcription = require_match(Stage::Transcription, action_models)?;

    match job_type {
        JobType::Transcription => {}
        JobType::Summary => {
            require_match(Stage::Summary, action_models)?;
        }
        JobType::Graph => {
            require_match(Stage::Graph, action_models)?;
            require_match(Stage::EntityRelation, action_models)?;
        }
    }

    Ok(transcription)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn caps(names: &[&str]) -> Vec<Capability> {
        names.iter().map(|n| n.parse().unwrap()).collect()
    }

    #[test]
    fn first_match_returns_earliest_entry_in_list_order() {
        let models = caps(&[
            "summary.second-choice",
            "transcription.local-whisper",
            "summary.first-listed-wins",
        ]);
        let found = first_match(Stage::Summary, &models).unwrap();
        assert_eq!(found.provider, "second-choice");
        assert!(first_match(Stage::Graph, &models).is_none());
    }

    /// Property-style check over generated lists: for every rotation and
    /// truncation of a capability pool, `first_match` agrees with a naive
    /// linear scan and returns `None` exactly when no entry has the stage.
    #[test]
    fn first_match_agrees_with_naive_scan() {
        let pool = caps(&[
            "transcription.a",
            "summary.b",
            "entity-relation.c",
            "graph.d",
            "summary.e",
            "transcription.f",
            "graph.g",
        ]);

        for start in 0..pool.len() {
            for len in 0..=pool.len() {
                let rotated: Vec<Capability> = pool
                    .iter()
                    .cycle()
                    .skip(start)
                    .take(len)
                    .cloned()
                    .collect();

                for stage in Stage::ALL {
                    let naive = rotated.iter().find(|c| c.stage == stage);
                    assert_eq!(first_match(stage, &rotated), naive);
                    if naive.is_none() {
                        assert_matches!(
                            require_match(stage, &rotated),
                            Err(CoreError::Validation(_))
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn transcription_jobs_need_only_a_transcription_model() {
        let models = caps(&["transcription.x"]);
        let chosen = validate_action_models(JobType::Transcription, &models).unwrap();
        assert_eq!(chosen.provider, "x");
    }

    #[test]
    fn summary_jobs_without_a_summary_model_are_rejected() {
        let models = caps(&["transcription.x"]);
        let err = validate_action_models(JobType::Summary, &models).unwrap_err();
        assert_matches!(err, CoreError::Validation(msg) => {
            assert!(msg.contains("summary"), "error names the missing prefix: {msg}");
        });
    }

    #[test]
    fn graph_jobs_require_all_three_capabilities() {
        let full = caps(&["transcription.x", "entity-relation.y", "graph.z"]);
        let chosen = validate_action_models(JobType::Graph, &full).unwrap();
        assert_eq!(chosen.provider, "x");

        let missing_er = caps(&["transcription.x", "graph.z"]);
        let err = validate_action_models(JobType::Graph, &missing_er).unwrap_err();
        assert_matches!(err, CoreError::Validation(msg) => {
            assert!(msg.contains("entity-relation"), "{msg}");
        });

        let missing_graph = caps(&["transcription.x", "entity-relation.y"]);
        let err = validate_action_models(JobType::Graph, &missing_graph).unwrap_err();
        assert_matches!(err, CoreError::Validation(msg) => {
            assert!(msg.contains("graph"), "{msg}");
        });
    }
}

//! Capability registry entity model.

use serde::Serialize;
use sqlx::FromRow;
use vigraph_core::types::Timestamp;

/// A row from the `available_models` table.
///
/// `name` is the full capability identifier (e.g.
/// `transcription.local-whisper`). A row is "visible" iff its `last_seen`
/// is within the freshness threshold at query time; nothing ever deletes
/// rows, they just age out of listings.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AvailableModel {
    pub name: String,
    pub last_seen: Timestamp,
}

/// Primary key type for BIGSERIAL rows (users).
pub type DbId = i64;

/// Primary key type for UUID rows (jobs, artifacts).
pub type JobId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

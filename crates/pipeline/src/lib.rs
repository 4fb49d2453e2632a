//! Pipeline orchestration: capability routing, the job state machine, and
//! the broker-driven orchestrator.
//!
//! - [`router`] -- first-match capability selection and per-type validation
//!   at job creation.
//! - [`transition`] -- the pure state-machine table.
//! - [`submit`] -- validate-then-persist job creation plus first dispatch.
//! - [`orchestrator`] -- the long-running consumer that applies stage
//!   results to job state and emits follow-up messages.

pub mod orchestrator;
pub mod router;
pub mod submit;
pub mod transition;

pub use orchestrator::Orchestrator;

use vigraph_broker::BrokerError;
use vigraph_core::CoreError;

/// Errors from pipeline operations.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Db(#[from] sqlx::Error),

    #[error(transparent)]
    Broker(#[from] BrokerError),

    #[error("Malformed message payload: {0}")]
    Decode(#[from] serde_json::Error),
}

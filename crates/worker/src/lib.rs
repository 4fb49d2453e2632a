//! Worker-side runtime pieces shared by every stage worker.
//!
//! The ML inference itself lives in external services; this crate carries
//! the plumbing those services share:
//!
//! - [`heartbeat`] -- periodic capability announcements.
//! - [`sentinel`] -- turns an uncaught handler error into `job.failed`
//!   instead of a silent drop or a broker redelivery loop.
//! - [`resilience`] -- bounded retry/backoff for flaky generation backends.
//! - [`runner`] -- subscribe-decode-handle glue around a [`StageHandler`].

pub mod heartbeat;
pub mod resilience;
pub mod runner;
pub mod sentinel;

pub use runner::StageHandler;
pub use sentinel::FailureMode;

use vigraph_broker::BrokerError;

/// Errors from worker-side operations.
#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    #[error(transparent)]
    Broker(#[from] BrokerError),

    #[error("Malformed message payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Provider call failed: {0}")]
    Provider(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

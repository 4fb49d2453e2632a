//! Subscribe-decode-handle glue around a stage handler.
//!
//! A worker process builds one [`StageHandler`] per capability it serves
//! and hands each to [`run_capability_worker`]. The runner owns the queue
//! subscription, the failure sentinel around every message, and shutdown,
//! so handler implementations stay pure provider calls.

use std::sync::Arc;

use async_trait::async_trait;
use futures::StreamExt;
use tokio_util::sync::CancellationToken;
use vigraph_broker::{Broker, Publisher};
use vigraph_core::capability::Capability;

use crate::sentinel::{self, FailureMode};
use crate::WorkerError;

/// A per-capability message handler.
///
/// `handle` decodes its own request payload; the sentinel around it turns
/// any error into a `job.failed` event.
#[async_trait]
pub trait StageHandler: Send + Sync {
    /// The capability this handler serves. Its routing key doubles as the
    /// subject and the queue group.
    fn capability(&self) -> &Capability;

    /// Process one request payload, publishing the stage result on
    /// success.
    async fn handle(&self, publisher: &dyn Publisher, payload: &[u8]) -> Result<(), WorkerError>;
}

/// Run one message through the sentinel-wrapped handler.
pub async fn handle_message(
    publisher: &dyn Publisher,
    handler: &dyn StageHandler,
    payload: &[u8],
    mode: FailureMode,
) -> Result<(), WorkerError> {
    sentinel::guard(publisher, payload, mode, handler.handle(publisher, payload)).await
}

/// Consume the handler's capability subject until `cancel` triggers.
///
/// The queue group is the routing key itself, so a fleet of workers
/// serving the same capability splits the stream one message each. In
/// [`FailureMode::Propagate`] a handler error also ends this loop.
pub async fn run_capability_worker(
    broker: Broker,
    handler: Arc<dyn StageHandler>,
    mode: FailureMode,
    cancel: CancellationToken,
) -> Result<(), WorkerError> {
    let routing_key = handler.capability().routing_key();
    let mut subscriber = broker.queue_subscribe(&routing_key, &routing_key).await?;
    tracing::info!(subject = %routing_key, "Capability worker started");

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!(subject = %routing_key, "Capability worker shutting down");
                return Ok(());
            }
            message = subscriber.next() => {
                let Some(message) = message else {
                    tracing::warn!(subject = %routing_key, "Subscription closed by broker");
                    return Ok(());
                };
                if let Err(error) =
                    handle_message(&broker, handler.as_ref(), &message.payload, mode).await
                {
                    tracing::error!(subject = %routing_key, error = %error, "Handler error, stopping");
                    return Err(error);
                }
            }
        }
    }
}

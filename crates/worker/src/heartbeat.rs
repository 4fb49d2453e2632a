//! Periodic capability heartbeats.
//!
//! Each worker announces every capability it serves on `model.available`
//! every [`DEFAULT_PERIOD`]. The period must stay strictly below the
//! orchestrator's freshness threshold (30s by default) or a healthy worker
//! flickers out of availability listings between beats.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use vigraph_broker::messages::{subjects, ModelAvailable};
use vigraph_broker::{publish_json, Publisher};
use vigraph_core::capability::Capability;

/// Default heartbeat period.
pub const DEFAULT_PERIOD: Duration = Duration::from_secs(10);

/// Announce `capabilities` on a fixed period until `cancel` triggers.
///
/// Publish failures are logged and the loop keeps going; presence is
/// best-effort and the next beat will try again.
pub async fn run_heartbeat(
    publisher: Arc<dyn Publisher>,
    capabilities: Vec<Capability>,
    period: Duration,
    cancel: CancellationToken,
) {
    let mut ticker = tokio::time::interval(period);
    tracing::info!(
        period_ms = period.as_millis() as u64,
        count = capabilities.len(),
        "Heartbeat loop started",
    );

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Heartbeat loop shutting down");
                break;
            }
            _ = ticker.tick() => {
                for capability in &capabilities {
                    let message = ModelAvailable {
                        model_name: capability.routing_key(),
                    };
                    if let Err(e) =
                        publish_json(publisher.as_ref(), subjects::MODEL_AVAILABLE, &message).await
                    {
                        tracing::warn!(capability = %capability, error = %e, "Heartbeat publish failed");
                    }
                }
            }
        }
    }
}

//! NATS-backed broker client.
//!
//! Queue-per-capability maps to subject-per-capability. Work-queue
//! semantics (one delivery per message across a worker fleet) come from
//! `queue_subscribe` with a shared queue group.

use std::time::Duration;

use async_nats::Subscriber;
use async_trait::async_trait;
use serde::Serialize;
use tokio::time::timeout;

/// How long to wait for the initial broker connection.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Errors from broker connect/publish/subscribe operations.
#[derive(Debug, thiserror::Error)]
pub enum BrokerError {
    #[error("Broker connect failed: {0}")]
    Connect(String),

    #[error("Broker connect timed out after {0:?}")]
    ConnectTimeout(Duration),

    #[error("Publish to '{subject}' failed: {reason}")]
    Publish { subject: String, reason: String },

    #[error("Subscribe to '{subject}' failed: {reason}")]
    Subscribe { subject: String, reason: String },

    #[error("Message serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Object-safe publish abstraction.
///
/// Production code publishes through [`Broker`]; tests capture messages
/// with an in-memory implementation.
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Publish a raw payload to `subject`, awaiting the broker's
    /// acknowledgment of the publish (never worker-side completion).
    async fn publish(&self, subject: &str, payload: Vec<u8>) -> Result<(), BrokerError>;
}

/// Serialize `message` as JSON and publish it to `subject`.
pub async fn publish_json<T: Serialize + ?Sized>(
    publisher: &dyn Publisher,
    subject: &str,
    message: &T,
) -> Result<(), BrokerError> {
    let payload = serde_json::to_vec(message)?;
    publisher.publish(subject, payload).await
}

/// Connection to the message broker.
#[derive(Clone)]
pub struct Broker {
    client: async_nats::Client,
}

impl Broker {
    /// Connect to the broker at `url`, bounded by [`CONNECT_TIMEOUT`].
    pub async fn connect(url: &str) -> Result<Self, BrokerError> {
        let client = timeout(CONNECT_TIMEOUT, async_nats::connect(url))
            .await
            .map_err(|_| BrokerError::ConnectTimeout(CONNECT_TIMEOUT))?
            .map_err(|e| BrokerError::Connect(e.to_string()))?;
        tracing::info!(url, "Connected to message broker");
        Ok(Self { client })
    }

    /// Subscribe to `subject` with fan-out semantics (every subscriber
    /// sees every message).
    pub async fn subscribe(&self, subject: &str) -> Result<Subscriber, BrokerError> {
        self.client
            .subscribe(subject.to_string())
            .await
            .map_err(|e| BrokerError::Subscribe {
                subject: subject.to_string(),
                reason: e.to_string(),
            })
    }

    /// Subscribe to `subject` as part of `group`; each message is
    /// delivered to exactly one member of the group.
    pub async fn queue_subscribe(
        &self,
        subject: &str,
        group: &str,
    ) -> Result<Subscriber, BrokerError> {
        self.client
            .queue_subscribe(subject.to_string(), group.to_string())
            .await
            .map_err(|e| BrokerError::Subscribe {
                subject: subject.to_string(),
                reason: e.to_string(),
            })
    }
}

#[async_trait]
impl Publisher for Broker {
    async fn publish(&self, subject: &str, payload: Vec<u8>) -> Result<(), BrokerError> {
        self.client
            .publish(subject.to_string(), payload.into())
            .await
            .map_err(|e| BrokerError::Publish {
                subject: subject.to_string(),
                reason: e.to_string(),
            })?;
        // publish only buffers; flush is the broker-level acknowledgment.
        self.client
            .flush()
            .await
            .map_err(|e| BrokerError::Publish {
                subject: subject.to_string(),
                reason: e.to_string(),
            })
    }
}

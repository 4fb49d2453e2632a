//! Broker transport and wire contracts.
//!
//! - [`Broker`] -- thin wrapper over an `async_nats::Client`.
//! - [`Publisher`] -- object-safe publish abstraction so orchestration and
//!   worker code can be exercised against an in-memory double in tests.
//! - [`messages`] -- every message shape that crosses the broker, plus the
//!   fixed subject names.

pub mod client;
pub mod messages;

pub use client::{publish_json, Broker, BrokerError, Publisher};

// Re-exported so consumers of [`Broker::subscribe`] do not need their own
// async-nats dependency.
pub use async_nats::{Message, Subscriber};

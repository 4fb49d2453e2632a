//! Capability identity.
//!
//! A capability is a worker-advertised ability to run one [`Stage`] with one
//! backing provider, e.g. `transcription.local-whisper`. The full string is
//! also the broker subject stage requests are published to; that mapping is
//! confined to [`Capability::routing_key`] so nothing else in the domain
//! model depends on transport naming.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::stage::Stage;

/// A `{stage}.{provider}` capability identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Capability {
    pub stage: Stage,
    pub provider: String,
}

impl Capability {
    pub fn new(stage: Stage, provider: impl Into<String>) -> Self {
        Self {
            stage,
            provider: provider.into(),
        }
    }

    /// The wire-level subject / queue name for this capability.
    ///
    /// This is the single place where a capability becomes a routing key.
    pub fn routing_key(&self) -> String {
        format!("{}.{}", self.stage, self.provider)
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.stage, self.provider)
    }
}

impl FromStr for Capability {
    type Err = CoreError;

    /// Parse `"{stage}.{provider}"`. The provider part may itself contain
    /// dots (e.g. `summary.gemini-2.0-flash`); only the first dot splits.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (prefix, provider) = s
            .split_once('.')
            .ok_or_else(|| CoreError::Validation(format!("Malformed capability: {s}")))?;
        if provider.is_empty() {
            return Err(CoreError::Validation(format!("Malformed capability: {s}")));
        }
        Ok(Self {
            stage: prefix.parse()?,
            provider: provider.to_string(),
        })
    }
}

impl TryFrom<String> for Capability {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Capability> for String {
    fn from(value: Capability) -> Self {
        value.to_string()
    }
}

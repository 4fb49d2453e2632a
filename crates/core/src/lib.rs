//! Domain types shared across the vigraph workspace.
//!
//! This crate is dependency-light by design: it holds the capability and
//! stage vocabulary, the job lifecycle states, the typed artifact payloads,
//! and the domain error type. Everything transport- or storage-specific
//! lives in `vigraph-broker` and `vigraph-db`.

pub mod artifact;
pub mod capability;
pub mod error;
pub mod roles;
pub mod stage;
pub mod status;
pub mod types;

pub use artifact::ArtifactContent;
pub use capability::Capability;
pub use error::CoreError;
pub use stage::{JobType, Stage};
pub use status::JobStatus;

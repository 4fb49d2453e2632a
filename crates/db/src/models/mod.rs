pub mod artifact;
pub mod job;
pub mod registry;
pub mod user;

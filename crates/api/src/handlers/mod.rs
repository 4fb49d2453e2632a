//! Request handlers, one submodule per resource.
//!
//! Handlers delegate to the repositories in `vigraph_db` (and to
//! `vigraph_pipeline` for job submission) and map errors via `AppError`.

pub mod artifacts;
pub mod jobs;
pub mod models;
pub mod users;

pub mod artifact_repo;
pub mod job_repo;
pub mod registry_repo;
pub mod user_repo;

pub use artifact_repo::ArtifactRepo;
pub use job_repo::JobRepo;
pub use registry_repo::RegistryRepo;
pub use user_repo::UserRepo;

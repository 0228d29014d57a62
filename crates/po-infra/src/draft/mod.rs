pub mod file_repo;
pub mod migration;

pub use file_repo::FileDraftRepository;
pub use migration::{DraftMigrator, V1ToV2Migration};

//! Port interfaces for the application layer
//!
//! Ports define the contract between the wizard use cases and
//! infrastructure implementations. The core stays independent of storage,
//! HTTP and upload providers.

pub mod app_dirs;
pub mod draft_store;
pub mod errors;
pub mod registration;
pub mod upload;

pub use app_dirs::AppDirsPort;
pub use draft_store::{DraftMigrationPort, DraftStorePort};
pub use errors::AppDirsError;
pub use registration::RegistrationPort;
pub use upload::{UploadFolder, UploadPort, UploadRequest};

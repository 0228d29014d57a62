pub mod config;
pub mod draft;
pub mod fs;
pub mod registration;
pub mod upload;

pub use draft::FileDraftRepository;
pub use registration::HttpRegistrationClient;

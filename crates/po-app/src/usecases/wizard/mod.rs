//! Onboarding wizard use cases.
//!
//! This module exposes the onboarding orchestrator and the use cases it drives.

mod context;
pub mod orchestrator;
mod persistence;
pub mod rehydrate;
pub mod upload;

pub use orchestrator::{OnboardingOrchestrator, OrchestratorError, SubmissionOutcome};
pub use rehydrate::RehydrateDraft;
pub use upload::{AttachUpload, AttachUploadError, LocalFile};

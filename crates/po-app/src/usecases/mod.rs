pub mod wizard;

pub use wizard::{
    AttachUpload, AttachUploadError, LocalFile, OnboardingOrchestrator, OrchestratorError,
    RehydrateDraft, SubmissionOutcome,
};

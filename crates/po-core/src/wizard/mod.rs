//! Partner onboarding wizard domain.
//!
//! This module defines the step/field model, validation rules, navigation,
//! and the wizard state machine.

pub mod draft;
pub mod error_board;
pub mod field;
pub mod navigation;
pub mod persisted;
pub mod state_machine;
pub mod step;
pub mod submission;
pub mod validation;

pub use draft::{DraftError, OnboardingDraft, StepRecord};
pub use error_board::ErrorBoard;
pub use field::{ErrorFieldMap, Field, FieldKind, FieldLookup, FieldValue};
pub use navigation::NavigationState;
pub use persisted::{PersistedDraft, CURRENT_DRAFT_SCHEMA_VERSION, DRAFT_STORAGE_KEY};
pub use state_machine::{WizardAction, WizardEvent, WizardState, WizardStateMachine};
pub use step::Step;
pub use submission::{
    FieldErrors, RegisteredUser, RegistrationError, RegistrationPayload, RegistrationReceipt,
    SubmissionState,
};
pub use validation::{toggle_selection, FieldValidator};

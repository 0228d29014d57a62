//! # po-core
//!
//! Core domain models and business logic for partner onboarding.
//!
//! This crate contains pure business logic without any infrastructure dependencies.

pub mod app_dirs;
pub mod config;
pub mod ports;
pub mod wizard;

pub use app_dirs::AppDirs;
pub use config::OnboardingConfig;
pub use wizard::{
    Field, FieldValue, OnboardingDraft, PersistedDraft, Step, WizardAction, WizardEvent,
    WizardState, WizardStateMachine,
};

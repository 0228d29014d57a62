//! Partner Onboarding Application Layer
//!
//! This crate contains the wizard use cases and the orchestrator that runs
//! their side effects against the core ports.

pub mod usecases;

pub use usecases::{OnboardingOrchestrator, SubmissionOutcome};

//! Partner onboarding bootstrap: logging, configuration and wiring of the
//! adapters into the wizard orchestrator.

pub mod bootstrap;

pub mod config;
pub mod run;
pub mod tracing;
pub mod wiring;

pub use config::{load_or_empty, resolve_config_path, CONFIG_ENV_VAR};
pub use run::{load_resume_summary, ResumeSummary};
pub use wiring::{
    resolve_draft_path, wire_onboarding, OnboardingApp, OnboardingSettings, WiringError,
};

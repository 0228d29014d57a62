use std::fmt;
use std::path::Path;
use std::sync::Arc;

use po_app::usecases::RehydrateDraft;
use po_core::wizard::{FieldValidator, Step, WizardEvent, WizardState, WizardStateMachine};
use po_infra::FileDraftRepository;

/// Where a returning partner left off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeSummary {
    pub current_step: Step,
    pub total_steps: u8,
    pub history: Vec<Step>,
    pub steps_started: Vec<Step>,
    pub valid_steps: Vec<Step>,
}

impl ResumeSummary {
    pub fn from_state(state: &WizardState) -> Self {
        let steps_started = state.draft.steps_present();
        let valid_steps = steps_started
            .iter()
            .copied()
            .filter(|step| state.errors.is_step_valid(*step))
            .collect();

        Self {
            current_step: state.current_step(),
            total_steps: state.navigation.total_steps(),
            history: state.navigation.history().to_vec(),
            steps_started,
            valid_steps,
        }
    }

    pub fn is_fresh(&self) -> bool {
        self.steps_started.is_empty() && self.current_step == Step::FIRST
    }
}

/// Reads the saved draft straight from disk, without wiring registration.
///
/// A missing or unreadable draft reports as a fresh application.
pub async fn load_resume_summary(draft_path: &Path) -> ResumeSummary {
    let store = Arc::new(FileDraftRepository::new(draft_path.to_path_buf()));
    let state = match RehydrateDraft::new(store).execute().await {
        Some(persisted) => {
            WizardStateMachine::new(FieldValidator::for_today())
                .transition(WizardState::default(), WizardEvent::Rehydrated { persisted })
                .0
        }
        None => WizardState::default(),
    };
    ResumeSummary::from_state(&state)
}

fn join(steps: &[Step]) -> String {
    if steps.is_empty() {
        return "none".to_string();
    }
    steps
        .iter()
        .map(|step| step.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for ResumeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_fresh() {
            return write!(
                f,
                "No saved application. Starting at step 1 of {}.",
                self.total_steps
            );
        }
        writeln!(
            f,
            "Resuming at step {} of {} ({:?}).",
            self.current_step, self.total_steps, self.current_step
        )?;
        writeln!(f, "Visited: {}", join(&self.history))?;
        writeln!(f, "Started: {}", join(&self.steps_started))?;
        write!(f, "Complete: {}", join(&self.valid_steps))
    }
}

//! Field error messages and cached per-step validity.

use std::collections::BTreeMap;

use crate::wizard::draft::OnboardingDraft;
use crate::wizard::field::Field;
use crate::wizard::step::Step;

/// Field → message map plus a step → validity cache.
///
/// Only non-empty messages are stored; clearing a field removes its entry.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ErrorBoard {
    field_errors: BTreeMap<Field, String>,
    step_validity: BTreeMap<Step, bool>,
}

impl ErrorBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a message for the field. An empty message clears the entry.
    pub fn set_error(&mut self, field: Field, message: impl Into<String>) {
        let message = message.into();
        if message.is_empty() {
            self.field_errors.remove(&field);
        } else {
            self.field_errors.insert(field, message);
        }
    }

    pub fn clear_error(&mut self, field: Field) {
        self.field_errors.remove(&field);
    }

    /// Applies a validation outcome: `Some` records it, `None` clears it.
    pub fn record(&mut self, field: Field, outcome: Option<String>) {
        match outcome {
            Some(message) => self.set_error(field, message),
            None => self.clear_error(field),
        }
    }

    pub fn clear_all(&mut self) {
        self.field_errors.clear();
        self.step_validity.clear();
    }

    pub fn error(&self, field: Field) -> Option<&str> {
        self.field_errors.get(&field).map(String::as_str)
    }

    pub fn field_errors(&self) -> &BTreeMap<Field, String> {
        &self.field_errors
    }

    pub fn has_errors(&self) -> bool {
        !self.field_errors.is_empty()
    }

    pub fn step_has_errors(&self, step: Step) -> bool {
        self.field_errors.keys().any(|field| field.step() == step)
    }

    /// Cached validity; a step never recomputed counts as invalid.
    pub fn is_step_valid(&self, step: Step) -> bool {
        self.step_validity.get(&step).copied().unwrap_or(false)
    }

    /// Re-derives the step's validity from the board and the draft.
    pub fn recompute_step(&mut self, step: Step, draft: &OnboardingDraft) -> bool {
        let valid = !self.step_has_errors(step)
            && step
                .required_fields()
                .into_iter()
                .all(|field| draft.is_filled(field));
        self.step_validity.insert(step, valid);
        valid
    }

    pub fn recompute_all(&mut self, draft: &OnboardingDraft) {
        for step in Step::ALL {
            self.recompute_step(step, draft);
        }
    }
}

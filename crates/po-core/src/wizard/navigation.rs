//! Step navigation with a visited-steps history stack.

use crate::wizard::error_board::ErrorBoard;
use crate::wizard::step::Step;

/// Current step plus the history of visited steps, oldest first.
///
/// `history` is never empty, its last entry is always `current_step`, and no
/// two adjacent entries are equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationState {
    current_step: Step,
    history: Vec<Step>,
}

impl Default for NavigationState {
    fn default() -> Self {
        Self::new()
    }
}

impl NavigationState {
    pub fn new() -> Self {
        Self {
            current_step: Step::FIRST,
            history: vec![Step::FIRST],
        }
    }

    /// Rebuilds navigation from persisted parts, repairing a history that
    /// breaks the stack invariants.
    pub fn restore(current_step: Step, history: Vec<Step>) -> Self {
        let mut repaired: Vec<Step> = Vec::with_capacity(history.len() + 1);
        for step in history {
            if repaired.last() != Some(&step) {
                repaired.push(step);
            }
        }
        if repaired.last() != Some(&current_step) {
            repaired.push(current_step);
        }
        Self {
            current_step,
            history: repaired,
        }
    }

    pub fn current_step(&self) -> Step {
        self.current_step
    }

    pub fn total_steps(&self) -> u8 {
        Step::TOTAL
    }

    pub fn history(&self) -> &[Step] {
        &self.history
    }

    /// Moves to `step`, pushing it unless it is already on top.
    pub fn set_current_step(&mut self, step: Step) {
        if self.history.last() != Some(&step) {
            self.history.push(step);
        }
        self.current_step = step;
    }

    /// Pops back to the previously visited step. Returns `false` when there
    /// is nowhere to go back to.
    pub fn go_to_previous_step(&mut self) -> bool {
        if !self.can_go_back() {
            return false;
        }
        self.history.pop();
        if let Some(previous) = self.history.last() {
            self.current_step = *previous;
        }
        true
    }

    /// Advances one step. Returns `false` on the last step.
    pub fn go_to_next_step(&mut self) -> bool {
        match self.current_step.next() {
            Some(next) => {
                self.set_current_step(next);
                true
            }
            None => false,
        }
    }

    pub fn can_go_back(&self) -> bool {
        self.history.len() > 1
    }

    pub fn can_go_forward(&self, errors: &ErrorBoard) -> bool {
        !self.current_step.is_last() && errors.is_step_valid(self.current_step)
    }
}

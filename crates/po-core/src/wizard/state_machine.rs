//! Wizard state machine.
//!
//! Defines a pure state transition function for the partner onboarding wizard.

use std::collections::BTreeSet;

use crate::wizard::draft::{OnboardingDraft, StepRecord};
use crate::wizard::error_board::ErrorBoard;
use crate::wizard::field::{ErrorFieldMap, Field, FieldKind, FieldLookup, FieldValue};
use crate::wizard::navigation::NavigationState;
use crate::wizard::persisted::PersistedDraft;
use crate::wizard::step::Step;
use crate::wizard::submission::{
    FieldErrors, RegistrationPayload, SubmissionState, GENERIC_RETRY_MESSAGE,
    TERMS_REQUIRED_MESSAGE,
};
use crate::wizard::validation::{toggle_selection, FieldValidator};

/// Whole wizard state.
///
/// 向导完整状态。
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WizardState {
    pub draft: OnboardingDraft,
    pub navigation: NavigationState,
    pub errors: ErrorBoard,
    pub submission: SubmissionState,
}

impl WizardState {
    pub fn current_step(&self) -> Step {
        self.navigation.current_step()
    }

    pub fn can_go_back(&self) -> bool {
        self.navigation.can_go_back()
    }

    pub fn can_go_forward(&self) -> bool {
        self.navigation.can_go_forward(&self.errors)
    }

    pub fn snapshot(&self) -> PersistedDraft {
        PersistedDraft::capture(&self.draft, &self.navigation)
    }
}

/// Events that drive the wizard.
///
/// 驱动向导的事件。
#[derive(Debug, Clone, PartialEq)]
pub enum WizardEvent {
    /// A screen changed one field.
    ///
    /// 页面修改了一个字段。
    FieldChanged { field: Field, value: FieldValue },
    /// An item was toggled in a multi-select field.
    ///
    /// 多选字段中切换了一项。
    SelectionToggled { field: Field, item: String },
    /// A screen stored a complete record for its step.
    ///
    /// 页面保存了整步记录。
    StepRecordReplaced { record: StepRecord },
    /// User pressed "continue" on the current step.
    ///
    /// 用户在当前步骤点击继续。
    Continue,
    /// Navigate back to the previously visited step.
    ///
    /// 返回上一个访问过的步骤。
    GoBack,
    /// Jump to any step, e.g. an "edit" link on the review screen.
    ///
    /// 跳转到任意步骤。
    JumpToStep { step: Step },
    SetError { field: Field, message: String },
    ClearError { field: Field },
    ClearAllErrors,
    /// User submitted the application.
    ///
    /// 用户提交申请。
    SubmitRequested,
    /// Registration succeeded (network).
    ///
    /// 注册成功（网络回调）。
    RegistrationSucceeded,
    /// Backend rejected specific fields.
    ///
    /// 后端拒绝了部分字段。
    RegistrationRejected { errors: Vec<FieldErrors> },
    /// Registration failed for a reason not tied to a field.
    ///
    /// 注册失败（与字段无关）。
    RegistrationFailed { message: String },
    /// Discard everything and start over.
    ///
    /// 清空并重新开始。
    Reset,
    /// Draft loaded from storage at startup.
    ///
    /// 启动时从存储恢复草稿。
    Rehydrated { persisted: PersistedDraft },
}

impl WizardEvent {
    /// Name safe to log; payloads may carry passwords.
    pub fn name(&self) -> &'static str {
        match self {
            WizardEvent::FieldChanged { .. } => "FieldChanged",
            WizardEvent::SelectionToggled { .. } => "SelectionToggled",
            WizardEvent::StepRecordReplaced { .. } => "StepRecordReplaced",
            WizardEvent::Continue => "Continue",
            WizardEvent::GoBack => "GoBack",
            WizardEvent::JumpToStep { .. } => "JumpToStep",
            WizardEvent::SetError { .. } => "SetError",
            WizardEvent::ClearError { .. } => "ClearError",
            WizardEvent::ClearAllErrors => "ClearAllErrors",
            WizardEvent::SubmitRequested => "SubmitRequested",
            WizardEvent::RegistrationSucceeded => "RegistrationSucceeded",
            WizardEvent::RegistrationRejected { .. } => "RegistrationRejected",
            WizardEvent::RegistrationFailed { .. } => "RegistrationFailed",
            WizardEvent::Reset => "Reset",
            WizardEvent::Rehydrated { .. } => "Rehydrated",
        }
    }
}

/// Side-effects produced by state transitions.
///
/// 状态迁移产生的副作用。
#[derive(Debug, Clone, PartialEq)]
pub enum WizardAction {
    /// Write the snapshot to durable storage.
    ///
    /// 持久化草稿快照。
    PersistDraft(PersistedDraft),
    /// Remove the persisted draft.
    ///
    /// 删除已持久化的草稿。
    ClearPersistedDraft,
    /// Send the registration request.
    ///
    /// 发送注册请求。
    Register(RegistrationPayload),
}

impl WizardAction {
    pub fn name(&self) -> &'static str {
        match self {
            WizardAction::PersistDraft(_) => "PersistDraft",
            WizardAction::ClearPersistedDraft => "ClearPersistedDraft",
            WizardAction::Register(_) => "Register",
        }
    }
}

/// Pure wizard state machine.
///
/// 纯状态机：不包含副作用。
#[derive(Debug, Clone, Copy)]
pub struct WizardStateMachine {
    validator: FieldValidator,
}

impl WizardStateMachine {
    pub fn new(validator: FieldValidator) -> Self {
        Self { validator }
    }

    pub fn validator(&self) -> &FieldValidator {
        &self.validator
    }

    pub fn transition(
        &self,
        mut state: WizardState,
        event: WizardEvent,
    ) -> (WizardState, Vec<WizardAction>) {
        match event {
            WizardEvent::FieldChanged { field, value } => {
                if state.draft.apply(field, value).is_err() {
                    return (state, Vec::new());
                }
                self.revalidate_after_change(&mut state, field);
                let actions = vec![persist(&state)];
                (state, actions)
            }
            WizardEvent::SelectionToggled { field, item } => {
                if field.kind() != FieldKind::List {
                    return (state, Vec::new());
                }
                let current = state
                    .draft
                    .value(field)
                    .and_then(|value| value.as_list().map(<[String]>::to_vec))
                    .unwrap_or_default();
                let next = toggle_selection(field, &current, &item);
                self.transition(
                    state,
                    WizardEvent::FieldChanged {
                        field,
                        value: FieldValue::List(next),
                    },
                )
            }
            WizardEvent::StepRecordReplaced { record } => {
                let step = record.step();
                state.draft.update(record);
                for field in step.fields() {
                    if state.draft.is_filled(field) || state.errors.error(field).is_some() {
                        let outcome = self.validator.validate_current(field, &state.draft);
                        state.errors.record(field, outcome);
                    }
                }
                state.errors.recompute_step(step, &state.draft);
                let actions = vec![persist(&state)];
                (state, actions)
            }
            WizardEvent::Continue => {
                let step = state.current_step();
                for field in step.fields() {
                    let outcome = self.validator.validate_current(field, &state.draft);
                    state.errors.record(field, outcome);
                }
                state.errors.recompute_step(step, &state.draft);
                if state.can_go_forward() && state.navigation.go_to_next_step() {
                    let actions = vec![persist(&state)];
                    (state, actions)
                } else {
                    (state, Vec::new())
                }
            }
            WizardEvent::GoBack => {
                if state.navigation.go_to_previous_step() {
                    let actions = vec![persist(&state)];
                    (state, actions)
                } else {
                    (state, Vec::new())
                }
            }
            WizardEvent::JumpToStep { step } => {
                if step == state.current_step() {
                    return (state, Vec::new());
                }
                state.navigation.set_current_step(step);
                let actions = vec![persist(&state)];
                (state, actions)
            }
            WizardEvent::SetError { field, message } => {
                state.errors.set_error(field, message);
                state.errors.recompute_step(field.step(), &state.draft);
                (state, Vec::new())
            }
            WizardEvent::ClearError { field } => {
                state.errors.clear_error(field);
                state.errors.recompute_step(field.step(), &state.draft);
                (state, Vec::new())
            }
            WizardEvent::ClearAllErrors => {
                state.errors.clear_all();
                state.errors.recompute_all(&state.draft);
                (state, Vec::new())
            }
            WizardEvent::SubmitRequested => {
                if state.submission.is_submitting() {
                    return (state, Vec::new());
                }
                if !state.draft.is_filled(Field::AgreeToTerms) {
                    let outcome = self.validator.validate_current(Field::AgreeToTerms, &state.draft);
                    state.errors.record(Field::AgreeToTerms, outcome);
                    state.errors.recompute_step(Step::AccountSetup, &state.draft);
                    state.submission.reject_locally(TERMS_REQUIRED_MESSAGE);
                    return (state, Vec::new());
                }
                state.submission.begin();
                let payload = RegistrationPayload::assemble(&state.draft);
                (state, vec![WizardAction::Register(payload)])
            }
            WizardEvent::RegistrationSucceeded => {
                if !state.submission.is_submitting() {
                    return (state, Vec::new());
                }
                (WizardState::default(), vec![WizardAction::ClearPersistedDraft])
            }
            WizardEvent::RegistrationRejected { errors } => {
                if !state.submission.is_submitting() {
                    return (state, Vec::new());
                }
                let Some(first) = errors.first() else {
                    state.submission.fail(GENERIC_RETRY_MESSAGE);
                    return (state, Vec::new());
                };
                let step = ErrorFieldMap::resolve(&first.field).step();
                let mut touched_steps = BTreeSet::new();
                for entry in &errors {
                    if let FieldLookup::Known { field, step: owner } = ErrorFieldMap::resolve(&entry.field) {
                        state.errors.set_error(field, entry.first_message());
                        touched_steps.insert(owner);
                    }
                }
                touched_steps.insert(step);
                for touched in touched_steps {
                    state.errors.recompute_step(touched, &state.draft);
                }
                state.navigation.set_current_step(step);
                state.submission.fail(first.first_message());
                let actions = vec![persist(&state)];
                (state, actions)
            }
            WizardEvent::RegistrationFailed { message } => {
                if !state.submission.is_submitting() {
                    return (state, Vec::new());
                }
                state.submission.fail(message);
                (state, Vec::new())
            }
            // An in-flight registration must settle first.
            WizardEvent::Reset if state.submission.is_submitting() => (state, Vec::new()),
            WizardEvent::Reset => (WizardState::default(), vec![WizardAction::ClearPersistedDraft]),
            WizardEvent::Rehydrated { persisted } => {
                let navigation = persisted.navigation();
                let mut next = WizardState {
                    draft: persisted.form_data,
                    navigation,
                    ..WizardState::default()
                };
                next.errors.recompute_all(&next.draft);
                (next, Vec::new())
            }
        }
    }

    /// Validates the changed field, re-checks fields that depend on it, and
    /// refreshes the step's validity.
    fn revalidate_after_change(&self, state: &mut WizardState, field: Field) {
        let outcome = self.validator.validate_current(field, &state.draft);
        state.errors.record(field, outcome);

        for dependent in field.dependents() {
            let touched = dependent.kind() == FieldKind::Group
                || state.draft.is_filled(*dependent)
                || state.errors.error(*dependent).is_some();
            if touched {
                let outcome = self.validator.validate_current(*dependent, &state.draft);
                state.errors.record(*dependent, outcome);
            }
        }

        state.errors.recompute_step(field.step(), &state.draft);
    }
}

fn persist(state: &WizardState) -> WizardAction {
    WizardAction::PersistDraft(state.snapshot())
}

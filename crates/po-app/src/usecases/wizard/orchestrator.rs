//! Onboarding orchestrator.
//!
//! This module coordinates the wizard state machine and its side effects:
//! draft persistence, the registration call, rehydration and uploads.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, info_span, warn, Instrument};

use po_core::ports::{DraftStorePort, RegistrationPort};
use po_core::wizard::{
    Field, FieldValue, RegistrationError, RegistrationPayload, RegistrationReceipt, Step,
    WizardAction, WizardEvent, WizardState, WizardStateMachine,
};

use crate::usecases::wizard::context::WizardContext;
use crate::usecases::wizard::persistence::DraftPersistence;
use crate::usecases::wizard::rehydrate::RehydrateDraft;
use crate::usecases::wizard::upload::{AttachUpload, AttachUploadError, LocalFile};

pub const SUBMISSION_TIMEOUT_MESSAGE: &str =
    "The server took too long to respond. Please try again.";
pub const SUBMISSION_CANCELLED_MESSAGE: &str = "Submission cancelled. You can try again.";

/// Errors produced by the onboarding orchestrator.
#[derive(Debug, thiserror::Error)]
pub enum OrchestratorError {
    /// Registration outcomes and submit requests only come from `submit`.
    #[error("event {0} is driven by the orchestrator itself")]
    InternalEvent(&'static str),
    #[error(transparent)]
    Upload(#[from] AttachUploadError),
}

/// How a submission attempt ended.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionOutcome {
    /// Registered; the wizard and the persisted draft are reset.
    Succeeded(RegistrationReceipt),
    /// The backend rejected a field; the wizard now shows its step.
    Redirected { step: Step, message: String },
    /// Nothing changed except the surfaced message. Safe to retry.
    Failed(String),
    /// A submission was already in flight.
    Ignored,
}

enum CallResult {
    Finished(Result<RegistrationReceipt, RegistrationError>),
    TimedOut,
    Cancelled,
}

/// Orchestrator that drives wizard state and side effects.
pub struct OnboardingOrchestrator {
    context: Arc<WizardContext>,
    machine: WizardStateMachine,
    submit_timeout: Duration,

    persistence: DraftPersistence,
    rehydrate_draft: Arc<RehydrateDraft>,
    attach_upload: Arc<AttachUpload>,
    registration: Arc<dyn RegistrationPort>,
}

impl OnboardingOrchestrator {
    /// Must be called inside a tokio runtime; starts the persistence writer.
    pub fn new(
        machine: WizardStateMachine,
        draft_store: Arc<dyn DraftStorePort>,
        registration: Arc<dyn RegistrationPort>,
        attach_upload: Arc<AttachUpload>,
        submit_timeout: Duration,
    ) -> Self {
        Self {
            context: WizardContext::new(WizardState::default()),
            machine,
            submit_timeout,
            persistence: DraftPersistence::spawn(draft_store.clone()),
            rehydrate_draft: Arc::new(RehydrateDraft::new(draft_store)),
            attach_upload,
            registration,
        }
    }

    pub async fn get_state(&self) -> WizardState {
        self.context.snapshot().await
    }

    /// Applies a user-driven event and returns the new state.
    pub async fn dispatch(&self, event: WizardEvent) -> Result<WizardState, OrchestratorError> {
        match event {
            WizardEvent::SubmitRequested
            | WizardEvent::RegistrationSucceeded
            | WizardEvent::RegistrationRejected { .. }
            | WizardEvent::RegistrationFailed { .. } => {
                Err(OrchestratorError::InternalEvent(event.name()))
            }
            event => Ok(self.apply(event).await.0),
        }
    }

    pub async fn change_field(&self, field: Field, value: FieldValue) -> WizardState {
        self.apply(WizardEvent::FieldChanged { field, value }).await.0
    }

    pub async fn toggle_selection(&self, field: Field, item: impl Into<String>) -> WizardState {
        self.apply(WizardEvent::SelectionToggled {
            field,
            item: item.into(),
        })
        .await
        .0
    }

    pub async fn continue_step(&self) -> WizardState {
        self.apply(WizardEvent::Continue).await.0
    }

    pub async fn go_back(&self) -> WizardState {
        self.apply(WizardEvent::GoBack).await.0
    }

    pub async fn jump_to(&self, step: Step) -> WizardState {
        self.apply(WizardEvent::JumpToStep { step }).await.0
    }

    /// Clears the draft. Ignored while a registration call is out.
    pub async fn reset(&self) -> WizardState {
        if self.context.is_submitting().await {
            debug!("reset ignored, registration in flight");
        }
        self.apply(WizardEvent::Reset).await.0
    }

    /// Loads the persisted draft, if any, into the wizard.
    pub async fn rehydrate(&self) -> WizardState {
        match self.rehydrate_draft.execute().await {
            Some(persisted) => self.apply(WizardEvent::Rehydrated { persisted }).await.0,
            None => self.get_state().await,
        }
    }

    /// Uploads a file for an upload field and stores the returned URL.
    pub async fn attach_upload(
        &self,
        field: Field,
        file: LocalFile,
    ) -> Result<WizardState, OrchestratorError> {
        let url = self.attach_upload.execute(field, file).await?;
        Ok(self
            .apply(WizardEvent::FieldChanged {
                field,
                value: FieldValue::Text(url),
            })
            .await
            .0)
    }

    /// Submits the application.
    ///
    /// The registration call runs outside the dispatch lock so the wizard stays
    /// responsive. It is bounded by the submit timeout and abandoned when
    /// `cancel` fires; both end as a retryable failure.
    pub async fn submit(&self, cancel: CancellationToken) -> SubmissionOutcome {
        let span = info_span!("usecase.onboarding.submit");
        async {
            let (state, payload) = self.apply(WizardEvent::SubmitRequested).await;
            let Some(payload) = payload else {
                if state.submission.is_submitting() {
                    debug!("submission already in flight, ignoring");
                    return SubmissionOutcome::Ignored;
                }
                let message = state.submission.last_error().unwrap_or_default().to_string();
                return SubmissionOutcome::Failed(message);
            };

            let result = self.call_registration(&payload, &cancel).await;
            self.settle(result).await
        }
        .instrument(span)
        .await
    }

    /// Waits until queued draft writes have reached the store.
    pub async fn flush_persistence(&self) {
        self.persistence.flush().await;
    }

    async fn call_registration(
        &self,
        payload: &RegistrationPayload,
        cancel: &CancellationToken,
    ) -> CallResult {
        tokio::select! {
            _ = cancel.cancelled() => CallResult::Cancelled,
            result = tokio::time::timeout(self.submit_timeout, self.registration.register(payload)) => {
                match result {
                    Ok(result) => CallResult::Finished(result),
                    Err(_) => CallResult::TimedOut,
                }
            }
        }
    }

    async fn settle(&self, result: CallResult) -> SubmissionOutcome {
        match result {
            CallResult::Finished(Ok(receipt)) => {
                info!(user_id = %receipt.user.id, "partner registration succeeded");
                self.apply(WizardEvent::RegistrationSucceeded).await;
                SubmissionOutcome::Succeeded(receipt)
            }
            CallResult::Finished(Err(RegistrationError::Rejected(errors))) if !errors.is_empty() => {
                let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
                warn!(fields = ?fields, "partner registration rejected fields");
                let (state, _) = self
                    .apply(WizardEvent::RegistrationRejected { errors })
                    .await;
                SubmissionOutcome::Redirected {
                    step: state.current_step(),
                    message: state.submission.last_error().unwrap_or_default().to_string(),
                }
            }
            CallResult::Finished(Err(err)) => {
                warn!(error = %err, "partner registration failed");
                self.fail_submission(err.user_message()).await
            }
            CallResult::TimedOut => {
                warn!(timeout_secs = self.submit_timeout.as_secs(), "partner registration timed out");
                self.fail_submission(SUBMISSION_TIMEOUT_MESSAGE.to_string()).await
            }
            CallResult::Cancelled => {
                info!("partner registration cancelled by user");
                self.fail_submission(SUBMISSION_CANCELLED_MESSAGE.to_string()).await
            }
        }
    }

    async fn fail_submission(&self, message: String) -> SubmissionOutcome {
        self.apply(WizardEvent::RegistrationFailed {
            message: message.clone(),
        })
        .await;
        SubmissionOutcome::Failed(message)
    }

    /// Runs one transition under the dispatch lock and executes its actions.
    /// A `Register` action is handed back to the caller instead of executed.
    async fn apply(&self, event: WizardEvent) -> (WizardState, Option<RegistrationPayload>) {
        let _dispatch_guard = self.context.lock_dispatch().await;

        let span = info_span!("usecase.onboarding.dispatch", event = event.name());
        async {
            let current = self.context.snapshot().await;
            let from_step = current.current_step();
            let event_name = event.name();
            let (next, actions) = self.machine.transition(current, event);
            info!(
                from_step = from_step.number(),
                to_step = next.current_step().number(),
                submitting = next.submission.is_submitting(),
                event = %event_name,
                "wizard state transition"
            );

            let registration = self.execute_actions(actions);
            self.context.commit(next.clone()).await;
            (next, registration)
        }
        .instrument(span)
        .await
    }

    fn execute_actions(&self, actions: Vec<WizardAction>) -> Option<RegistrationPayload> {
        let mut registration = None;
        for action in actions {
            debug!(action = action.name(), "wizard executing action");
            match action {
                WizardAction::PersistDraft(draft) => self.persistence.save(draft),
                WizardAction::ClearPersistedDraft => self.persistence.clear(),
                WizardAction::Register(payload) => registration = Some(payload),
            }
        }
        registration
    }
}

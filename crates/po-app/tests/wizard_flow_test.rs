use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use po_app::usecases::wizard::orchestrator::{
    SUBMISSION_CANCELLED_MESSAGE, SUBMISSION_TIMEOUT_MESSAGE,
};
use po_app::usecases::{AttachUpload, LocalFile, OnboardingOrchestrator, SubmissionOutcome};
use po_core::ports::{DraftStorePort, RegistrationPort, UploadPort, UploadRequest};
use po_core::wizard::{
    Field, FieldErrors, FieldValidator, FieldValue, PersistedDraft, RegisteredUser,
    RegistrationError, RegistrationPayload, RegistrationReceipt, Step, WizardState,
    WizardStateMachine,
};
use tokio_util::sync::CancellationToken;

#[derive(Default)]
struct MemoryDraftStore {
    saved: Mutex<Option<PersistedDraft>>,
}

#[async_trait]
impl DraftStorePort for MemoryDraftStore {
    async fn load(&self) -> anyhow::Result<Option<PersistedDraft>> {
        Ok(self.saved.lock().unwrap().clone())
    }

    async fn save(&self, draft: &PersistedDraft) -> anyhow::Result<()> {
        *self.saved.lock().unwrap() = Some(draft.clone());
        Ok(())
    }

    async fn clear(&self) -> anyhow::Result<()> {
        *self.saved.lock().unwrap() = None;
        Ok(())
    }
}

/// Replies from a script, optionally after a delay.
struct ScriptedRegistration {
    replies: Mutex<VecDeque<Result<RegistrationReceipt, RegistrationError>>>,
    delay: Duration,
    payloads: Mutex<Vec<RegistrationPayload>>,
}

impl ScriptedRegistration {
    fn new(
        replies: Vec<Result<RegistrationReceipt, RegistrationError>>,
        delay: Duration,
    ) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            delay,
            payloads: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> usize {
        self.payloads.lock().unwrap().len()
    }
}

#[async_trait]
impl RegistrationPort for ScriptedRegistration {
    async fn register(
        &self,
        payload: &RegistrationPayload,
    ) -> Result<RegistrationReceipt, RegistrationError> {
        self.payloads.lock().unwrap().push(payload.clone());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(RegistrationError::Transport("no scripted reply".into())))
    }
}

struct CdnUpload;

#[async_trait]
impl UploadPort for CdnUpload {
    async fn upload(&self, request: UploadRequest) -> anyhow::Result<String> {
        Ok(format!(
            "https://cdn.example.com/{}/{}",
            request.folder.as_str(),
            request.file_name
        ))
    }
}

fn receipt() -> RegistrationReceipt {
    RegistrationReceipt {
        access_token: "access".into(),
        refresh_token: Some("refresh".into()),
        user: RegisteredUser {
            id: "partner-user-1".into(),
            email: Some("asha@example.com".into()),
            phone_number: Some("9876543210".into()),
            role: "partner".into(),
            first_name: Some("Asha".into()),
            last_name: Some("Rao".into()),
        },
        partner: None,
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}

fn build(
    registration: Arc<ScriptedRegistration>,
    store: Arc<MemoryDraftStore>,
    submit_timeout: Duration,
) -> OnboardingOrchestrator {
    init_tracing();
    OnboardingOrchestrator::new(
        WizardStateMachine::new(FieldValidator::new(2026)),
        store,
        registration,
        Arc::new(AttachUpload::new(Arc::new(CdnUpload))),
        submit_timeout,
    )
}

fn text(value: &str) -> FieldValue {
    FieldValue::text(value)
}

fn valid_answers(step: Step) -> Vec<(Field, FieldValue)> {
    match step {
        Step::PersonalInfo => vec![
            (Field::FirstName, text("Asha")),
            (Field::LastName, text("Rao")),
            (Field::Email, text("asha@example.com")),
            (Field::PhoneNumber, text("98765-43210")),
        ],
        Step::AccountSetup => vec![
            (Field::Password, text("Abc12345")),
            (Field::ConfirmPassword, text("Abc12345")),
            (Field::AgreeToTerms, FieldValue::Flag(true)),
        ],
        Step::BusinessProfile => vec![
            (Field::BusinessName, text("Spice Route")),
            (Field::Description, text("Home-style North Indian thalis.")),
            (Field::EstablishedYear, text("2015")),
        ],
        Step::LocationHours => vec![
            (Field::Street, text("12 MG Road")),
            (Field::City, text("Bengaluru")),
            (Field::State, text("Karnataka")),
            (Field::PostalCode, text("560001")),
        ],
        Step::CuisineServices => vec![(Field::CuisineTypes, FieldValue::list(["north-indian"]))],
        Step::Documents => vec![
            (Field::FssaiLicense, text("12345678901234")),
            (Field::GstNumber, text("22AAAAA0000A1Z5")),
            (Field::PanNumber, text("ABCDE1234F")),
            (Field::LicenseNumber, text("LIC-2024-001")),
        ],
        Step::PaymentSetup => vec![
            (Field::AccountNumber, text("123456789012")),
            (Field::IfscCode, text("SBIN0001234")),
            (Field::AccountHolderName, text("Asha Rao")),
            (Field::BankName, text("State Bank of India")),
        ],
        Step::ImagesBranding => vec![(Field::Instagram, text("@spiceroute"))],
    }
}

async fn complete_wizard(orchestrator: &OnboardingOrchestrator) -> WizardState {
    for step in Step::ALL {
        assert_eq!(orchestrator.get_state().await.current_step(), step);
        for (field, value) in valid_answers(step) {
            orchestrator.change_field(field, value).await;
        }
        let state = orchestrator.continue_step().await;
        if let Some(next) = step.next() {
            assert_eq!(state.current_step(), next, "continue from step {}", step);
        }
    }
    orchestrator.get_state().await
}

#[tokio::test]
async fn wizard_flow_full_walkthrough_registers_and_resets() {
    let registration = Arc::new(ScriptedRegistration::new(vec![Ok(receipt())], Duration::ZERO));
    let store = Arc::new(MemoryDraftStore::default());
    let orchestrator = build(registration.clone(), store.clone(), Duration::from_secs(30));

    let state = complete_wizard(&orchestrator).await;
    assert_eq!(state.current_step(), Step::ImagesBranding);
    assert_eq!(state.navigation.history().len(), 8);
    assert!(!state.errors.has_errors());

    let outcome = orchestrator.submit(CancellationToken::new()).await;
    orchestrator.flush_persistence().await;

    assert_eq!(outcome, SubmissionOutcome::Succeeded(receipt()));
    assert_eq!(orchestrator.get_state().await, WizardState::default());
    assert!(store.saved.lock().unwrap().is_none());

    let payloads = registration.payloads.lock().unwrap();
    let payload = &payloads[0];
    assert_eq!(payload.phone_number.as_deref(), Some("9876543210"));
    assert_eq!(
        payload.address.as_deref(),
        Some("12 MG Road, Bengaluru, Karnataka, 560001, India")
    );
    assert_eq!(payload.established_date.as_deref(), Some("2015-01-01"));
    assert!(payload.agree_to_terms);
}

#[tokio::test]
async fn wizard_flow_gst_rejection_redirects_and_allows_resubmit() {
    let registration = Arc::new(ScriptedRegistration::new(
        vec![
            Err(RegistrationError::Rejected(vec![FieldErrors::new(
                "gstNumber",
                vec!["GST number is already registered".into()],
            )])),
            Ok(receipt()),
        ],
        Duration::ZERO,
    ));
    let store = Arc::new(MemoryDraftStore::default());
    let orchestrator = build(registration.clone(), store.clone(), Duration::from_secs(30));
    complete_wizard(&orchestrator).await;

    let outcome = orchestrator.submit(CancellationToken::new()).await;
    assert_eq!(
        outcome,
        SubmissionOutcome::Redirected {
            step: Step::Documents,
            message: "GST number is already registered".into()
        }
    );
    let state = orchestrator.get_state().await;
    assert_eq!(state.current_step().number(), 6);
    assert!(!state.submission.is_submitting());
    assert_eq!(
        state.errors.error(Field::GstNumber),
        Some("GST number is already registered")
    );
    assert!(state.draft.documents.is_some(), "draft survives the failure");

    orchestrator
        .change_field(Field::GstNumber, text("29ABCDE1234F1Z5"))
        .await;
    let outcome = orchestrator.submit(CancellationToken::new()).await;
    assert!(matches!(outcome, SubmissionOutcome::Succeeded(_)));
    assert_eq!(registration.calls(), 2);
}

#[tokio::test]
async fn wizard_flow_rejection_spanning_steps_blocks_each_step() {
    let registration = Arc::new(ScriptedRegistration::new(
        vec![Err(RegistrationError::Rejected(vec![
            FieldErrors::new("gstNumber", vec!["GST number is already registered".into()]),
            FieldErrors::new("email", vec!["email already registered".into()]),
        ]))],
        Duration::ZERO,
    ));
    let orchestrator = build(
        registration,
        Arc::new(MemoryDraftStore::default()),
        Duration::from_secs(30),
    );
    complete_wizard(&orchestrator).await;

    let outcome = orchestrator.submit(CancellationToken::new()).await;
    assert_eq!(
        outcome,
        SubmissionOutcome::Redirected {
            step: Step::Documents,
            message: "GST number is already registered".into()
        }
    );

    let state = orchestrator.get_state().await;
    assert_eq!(state.errors.field_errors().len(), 2);
    assert_eq!(
        state.errors.error(Field::Email),
        Some("email already registered")
    );
    assert!(!state.errors.is_step_valid(Step::Documents));
    assert!(!state.errors.is_step_valid(Step::PersonalInfo));

    let state = orchestrator.jump_to(Step::PersonalInfo).await;
    assert!(!state.can_go_forward());

    let state = orchestrator
        .change_field(Field::Email, text("asha.rao@example.com"))
        .await;
    assert_eq!(state.errors.error(Field::Email), None);
    assert!(state.can_go_forward());
}

#[tokio::test]
async fn wizard_flow_unknown_backend_field_falls_back_to_first_step() {
    let registration = Arc::new(ScriptedRegistration::new(
        vec![Err(RegistrationError::Rejected(vec![FieldErrors::new(
            "referralCode",
            vec!["referral code expired".into()],
        )]))],
        Duration::ZERO,
    ));
    let orchestrator = build(
        registration,
        Arc::new(MemoryDraftStore::default()),
        Duration::from_secs(30),
    );
    complete_wizard(&orchestrator).await;

    let outcome = orchestrator.submit(CancellationToken::new()).await;

    assert_eq!(
        outcome,
        SubmissionOutcome::Redirected {
            step: Step::PersonalInfo,
            message: "referral code expired".into()
        }
    );
}

#[tokio::test]
async fn wizard_flow_history_example() {
    let orchestrator = build(
        Arc::new(ScriptedRegistration::new(vec![], Duration::ZERO)),
        Arc::new(MemoryDraftStore::default()),
        Duration::from_secs(30),
    );

    let state = orchestrator.jump_to(Step::BusinessProfile).await;
    assert_eq!(state.navigation.history(), &[Step::PersonalInfo, Step::BusinessProfile]);

    let state = orchestrator.go_back().await;
    assert_eq!(state.current_step(), Step::PersonalInfo);
    assert_eq!(state.navigation.history(), &[Step::PersonalInfo]);
    assert!(!state.can_go_back());
}

#[tokio::test]
async fn wizard_flow_password_change_reflags_confirmation() {
    let orchestrator = build(
        Arc::new(ScriptedRegistration::new(vec![], Duration::ZERO)),
        Arc::new(MemoryDraftStore::default()),
        Duration::from_secs(30),
    );
    orchestrator.change_field(Field::Password, text("Abc12345")).await;
    let state = orchestrator
        .change_field(Field::ConfirmPassword, text("Abc12345"))
        .await;
    assert_eq!(state.errors.error(Field::ConfirmPassword), None);

    let state = orchestrator.change_field(Field::Password, text("Different1")).await;

    assert_eq!(
        state.errors.error(Field::ConfirmPassword),
        Some("Passwords do not match")
    );
    assert!(!state.errors.is_step_valid(Step::AccountSetup));
}

#[tokio::test]
async fn wizard_flow_business_type_never_empties() {
    let orchestrator = build(
        Arc::new(ScriptedRegistration::new(vec![], Duration::ZERO)),
        Arc::new(MemoryDraftStore::default()),
        Duration::from_secs(30),
    );

    let state = orchestrator
        .toggle_selection(Field::BusinessType, "restaurant")
        .await;

    assert_eq!(
        state.draft.value(Field::BusinessType),
        Some(FieldValue::list(["restaurant"]))
    );
}

#[tokio::test(start_paused = true)]
async fn wizard_flow_concurrent_submit_is_ignored() {
    let registration = Arc::new(ScriptedRegistration::new(
        vec![Ok(receipt()), Ok(receipt())],
        Duration::from_secs(5),
    ));
    let orchestrator = build(
        registration.clone(),
        Arc::new(MemoryDraftStore::default()),
        Duration::from_secs(30),
    );
    orchestrator
        .change_field(Field::AgreeToTerms, FieldValue::Flag(true))
        .await;

    let (first, second) = tokio::join!(
        orchestrator.submit(CancellationToken::new()),
        orchestrator.submit(CancellationToken::new())
    );

    assert!(matches!(first, SubmissionOutcome::Succeeded(_)));
    assert_eq!(second, SubmissionOutcome::Ignored);
    assert_eq!(registration.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn wizard_flow_reset_waits_for_in_flight_submission() {
    let registration = Arc::new(ScriptedRegistration::new(
        vec![Ok(receipt()), Ok(receipt())],
        Duration::from_secs(5),
    ));
    let orchestrator = build(
        registration.clone(),
        Arc::new(MemoryDraftStore::default()),
        Duration::from_secs(30),
    );
    orchestrator
        .change_field(Field::AgreeToTerms, FieldValue::Flag(true))
        .await;

    let (first, (during_reset, second)) = tokio::join!(
        orchestrator.submit(CancellationToken::new()),
        async {
            tokio::time::sleep(Duration::from_secs(1)).await;
            let state = orchestrator.reset().await;
            (state, orchestrator.submit(CancellationToken::new()).await)
        }
    );

    assert!(during_reset.submission.is_submitting());
    assert!(during_reset.draft.account_setup.is_some());
    assert_eq!(second, SubmissionOutcome::Ignored);
    assert!(matches!(first, SubmissionOutcome::Succeeded(_)));
    assert_eq!(registration.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn wizard_flow_stalled_registration_times_out() {
    let registration = Arc::new(ScriptedRegistration::new(
        vec![Ok(receipt())],
        Duration::from_secs(120),
    ));
    let orchestrator = build(
        registration,
        Arc::new(MemoryDraftStore::default()),
        Duration::from_secs(30),
    );
    orchestrator
        .change_field(Field::AgreeToTerms, FieldValue::Flag(true))
        .await;
    orchestrator.jump_to(Step::ImagesBranding).await;

    let outcome = orchestrator.submit(CancellationToken::new()).await;

    assert_eq!(outcome, SubmissionOutcome::Failed(SUBMISSION_TIMEOUT_MESSAGE.into()));
    let state = orchestrator.get_state().await;
    assert!(!state.submission.is_submitting());
    assert_eq!(state.current_step(), Step::ImagesBranding);
    assert!(state.draft.account_setup.is_some());
}

#[tokio::test(start_paused = true)]
async fn wizard_flow_cancelled_submission_can_be_retried() {
    let registration = Arc::new(ScriptedRegistration::new(
        vec![Ok(receipt()), Ok(receipt())],
        Duration::from_secs(10),
    ));
    let orchestrator = build(
        registration.clone(),
        Arc::new(MemoryDraftStore::default()),
        Duration::from_secs(30),
    );
    orchestrator
        .change_field(Field::AgreeToTerms, FieldValue::Flag(true))
        .await;

    let cancel = CancellationToken::new();
    let canceller = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(1)).await;
        canceller.cancel();
    });

    let outcome = orchestrator.submit(cancel).await;
    assert_eq!(outcome, SubmissionOutcome::Failed(SUBMISSION_CANCELLED_MESSAGE.into()));
    assert!(!orchestrator.get_state().await.submission.is_submitting());

    let outcome = orchestrator.submit(CancellationToken::new()).await;
    assert!(matches!(outcome, SubmissionOutcome::Succeeded(_)));
    assert_eq!(registration.calls(), 2);
}

#[tokio::test]
async fn wizard_flow_upload_stores_url_in_draft() {
    let store = Arc::new(MemoryDraftStore::default());
    let orchestrator = build(
        Arc::new(ScriptedRegistration::new(vec![], Duration::ZERO)),
        store.clone(),
        Duration::from_secs(30),
    );

    let state = orchestrator
        .attach_upload(
            Field::FssaiDocument,
            LocalFile {
                path: "/tmp/fssai.pdf".into(),
                file_name: "fssai.pdf".into(),
                mime_type: Some("application/pdf".into()),
            },
        )
        .await
        .unwrap();
    orchestrator.flush_persistence().await;

    assert_eq!(
        state.draft.value(Field::FssaiDocument),
        Some(text("https://cdn.example.com/partner-app/license-documents/fssai.pdf"))
    );
    let saved = store.saved.lock().unwrap().clone().unwrap();
    assert_eq!(
        saved.form_data.documents.unwrap().documents.fssai_document,
        "https://cdn.example.com/partner-app/license-documents/fssai.pdf"
    );
}

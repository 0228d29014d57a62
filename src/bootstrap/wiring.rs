//! # Dependency Injection / 依赖注入模块
//!
//! The only place that knows both `po-infra` and `po-app`. It turns the raw
//! config facts into settings, builds the adapters, and hands them to the
//! orchestrator through port traits.
//!
//! 仅负责组装，不做业务决策。

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use po_app::usecases::{AttachUpload, OnboardingOrchestrator};
use po_core::app_dirs::AppDirs;
use po_core::config::OnboardingConfig;
use po_core::ports::{DraftStorePort, RegistrationPort, UploadPort};
use po_core::wizard::{FieldValidator, WizardStateMachine};
use po_infra::registration::{HttpRegistrationClient, HttpRegistrationConfig};
use po_infra::upload::UnconfiguredUpload;
use po_infra::FileDraftRepository;
use tracing::info;

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
const DEFAULT_MAX_ATTEMPTS: u32 = 3;
const DEFAULT_RETRY_BASE_DELAY: Duration = Duration::from_millis(1000);
const DEFAULT_SUBMIT_TIMEOUT: Duration = Duration::from_secs(30);

pub type WiringResult<T> = Result<T, WiringError>;

/// Errors during dependency injection
/// 依赖注入错误
#[derive(Debug, thiserror::Error)]
pub enum WiringError {
    #[error("registration.base_url is not configured")]
    MissingBaseUrl,

    #[error("Registration client initialization failed: {0}")]
    RegistrationInit(String),
}

/// Config facts with defaults applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnboardingSettings {
    pub draft_path: PathBuf,
    pub registration: HttpRegistrationConfig,
    pub submit_timeout: Duration,
}

impl OnboardingSettings {
    /// Zero and empty values fall back to defaults; only the base URL has none.
    pub fn resolve(config: &OnboardingConfig, app_dirs: &AppDirs) -> WiringResult<Self> {
        let base_url = config.registration_base_url.trim();
        if base_url.is_empty() {
            return Err(WiringError::MissingBaseUrl);
        }

        Ok(Self {
            draft_path: resolve_draft_path(config, app_dirs),
            registration: HttpRegistrationConfig {
                base_url: base_url.to_string(),
                request_timeout: secs_or(config.request_timeout_secs, DEFAULT_REQUEST_TIMEOUT),
                max_attempts: if config.max_retries == 0 {
                    DEFAULT_MAX_ATTEMPTS
                } else {
                    config.max_retries
                },
                retry_base_delay: if config.retry_base_delay_ms == 0 {
                    DEFAULT_RETRY_BASE_DELAY
                } else {
                    Duration::from_millis(config.retry_base_delay_ms)
                },
            },
            submit_timeout: secs_or(config.submit_timeout_secs, DEFAULT_SUBMIT_TIMEOUT),
        })
    }
}

/// The configured draft file, or the one in the platform data dir.
pub fn resolve_draft_path(config: &OnboardingConfig, app_dirs: &AppDirs) -> PathBuf {
    if config.draft_path.as_os_str().is_empty() {
        app_dirs.draft_file()
    } else {
        config.draft_path.clone()
    }
}

fn secs_or(secs: u64, default: Duration) -> Duration {
    if secs == 0 {
        default
    } else {
        Duration::from_secs(secs)
    }
}

/// Wired application handles.
pub struct OnboardingApp {
    pub orchestrator: Arc<OnboardingOrchestrator>,
    pub draft_path: PathBuf,
}

/// Builds the adapters and the orchestrator. Must run inside a tokio runtime.
pub fn wire_onboarding(settings: &OnboardingSettings) -> WiringResult<OnboardingApp> {
    let draft_store: Arc<dyn DraftStorePort> =
        Arc::new(FileDraftRepository::new(settings.draft_path.clone()));
    let registration: Arc<dyn RegistrationPort> = Arc::new(
        HttpRegistrationClient::new(settings.registration.clone())
            .map_err(|e| WiringError::RegistrationInit(format!("{e:#}")))?,
    );
    let upload: Arc<dyn UploadPort> = Arc::new(UnconfiguredUpload);

    let orchestrator = OnboardingOrchestrator::new(
        WizardStateMachine::new(FieldValidator::for_today()),
        draft_store,
        registration,
        Arc::new(AttachUpload::new(upload)),
        settings.submit_timeout,
    );

    info!(
        draft_path = %settings.draft_path.display(),
        submit_timeout_secs = settings.submit_timeout.as_secs(),
        "onboarding wired"
    );

    Ok(OnboardingApp {
        orchestrator: Arc::new(orchestrator),
        draft_path: settings.draft_path.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use po_core::wizard::Step;
    use tempfile::TempDir;

    fn app_dirs(root: &str) -> AppDirs {
        AppDirs {
            app_data_root: PathBuf::from(root),
        }
    }

    fn config_with_url() -> OnboardingConfig {
        OnboardingConfig {
            registration_base_url: "http://localhost:3001".into(),
            ..OnboardingConfig::empty()
        }
    }

    #[test]
    fn empty_values_resolve_to_defaults() {
        let settings =
            OnboardingSettings::resolve(&config_with_url(), &app_dirs("/tmp/po")).unwrap();

        assert_eq!(
            settings.draft_path,
            PathBuf::from("/tmp/po/onboarding-storage.json")
        );
        assert_eq!(settings.registration.request_timeout, Duration::from_secs(15));
        assert_eq!(settings.registration.max_attempts, 3);
        assert_eq!(settings.registration.retry_base_delay, Duration::from_millis(1000));
        assert_eq!(settings.submit_timeout, Duration::from_secs(30));
    }

    #[test]
    fn configured_values_win() {
        let config = OnboardingConfig {
            draft_path: PathBuf::from("/data/draft.json"),
            registration_base_url: " https://api.example.com ".into(),
            request_timeout_secs: 5,
            max_retries: 1,
            retry_base_delay_ms: 250,
            submit_timeout_secs: 10,
        };

        let settings = OnboardingSettings::resolve(&config, &app_dirs("/tmp/po")).unwrap();

        assert_eq!(settings.draft_path, PathBuf::from("/data/draft.json"));
        assert_eq!(settings.registration.base_url, "https://api.example.com");
        assert_eq!(settings.registration.max_attempts, 1);
        assert_eq!(settings.registration.retry_base_delay, Duration::from_millis(250));
        assert_eq!(settings.submit_timeout, Duration::from_secs(10));
    }

    #[test]
    fn missing_base_url_is_rejected() {
        let err = OnboardingSettings::resolve(&OnboardingConfig::empty(), &app_dirs("/tmp/po"))
            .unwrap_err();
        assert!(matches!(err, WiringError::MissingBaseUrl));
    }

    #[test]
    fn draft_path_resolves_without_base_url() {
        assert_eq!(
            resolve_draft_path(&OnboardingConfig::empty(), &app_dirs("/tmp/po")),
            PathBuf::from("/tmp/po/onboarding-storage.json")
        );
    }

    #[tokio::test]
    async fn wired_orchestrator_starts_fresh_without_a_draft() {
        let dir = TempDir::new().unwrap();
        let settings = OnboardingSettings::resolve(
            &config_with_url(),
            &app_dirs(dir.path().to_str().unwrap()),
        )
        .unwrap();

        let app = wire_onboarding(&settings).unwrap();
        let state = app.orchestrator.rehydrate().await;

        assert_eq!(state.current_step(), Step::PersonalInfo);
        assert!(state.draft.is_empty());
    }
}

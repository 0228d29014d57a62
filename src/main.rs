use anyhow::Context;
use partner_onboarding::bootstrap::{
    self, load_or_empty, load_resume_summary, resolve_config_path, resolve_draft_path,
    wire_onboarding, OnboardingSettings, CONFIG_ENV_VAR,
};
use po_core::ports::AppDirsPort;
use po_infra::fs::DirsAppDirsAdapter;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let app_dirs = DirsAppDirsAdapter::new()
        .get_app_dirs()
        .context("Failed to resolve application data directory")?;

    bootstrap::tracing::init_tracing_subscriber(Some(&app_dirs.logs_dir()))
        .context("Failed to initialize tracing")?;

    let config_path = resolve_config_path(
        std::env::args().nth(1),
        std::env::var(CONFIG_ENV_VAR).ok(),
    );
    let config = load_or_empty(config_path.as_deref())?;

    // Report saved progress even when registration is not configured yet.
    let draft_path = resolve_draft_path(&config, &app_dirs);
    let summary = load_resume_summary(&draft_path).await;
    info!(
        current_step = summary.current_step.number(),
        steps_started = summary.steps_started.len(),
        draft_path = %draft_path.display(),
        "saved onboarding progress"
    );
    println!("{summary}");

    let settings = OnboardingSettings::resolve(&config, &app_dirs)?;
    let app = wire_onboarding(&settings)?;
    let state = app.orchestrator.rehydrate().await;
    info!(
        current_step = state.current_step().number(),
        "onboarding session ready"
    );

    app.orchestrator.flush_persistence().await;
    Ok(())
}

use std::sync::Arc;

use po_core::ports::DraftStorePort;
use po_core::wizard::PersistedDraft;
use tracing::{info, warn};

/// Use case for loading the draft a partner left behind.
///
/// A store failure is not fatal: the wizard starts fresh.
pub struct RehydrateDraft {
    draft_store: Arc<dyn DraftStorePort>,
}

impl RehydrateDraft {
    pub fn new(draft_store: Arc<dyn DraftStorePort>) -> Self {
        Self { draft_store }
    }

    pub async fn execute(&self) -> Option<PersistedDraft> {
        match self.draft_store.load().await {
            Ok(Some(draft)) => {
                info!(
                    current_step = draft.current_step.number(),
                    steps_present = draft.form_data.steps_present().len(),
                    "onboarding draft rehydrated"
                );
                Some(draft)
            }
            Ok(None) => {
                info!("no onboarding draft to rehydrate");
                None
            }
            Err(err) => {
                warn!(error = %err, "failed to load onboarding draft, starting fresh");
                None
            }
        }
    }
}

//! Durable snapshot of the wizard.

use serde::{Deserialize, Serialize};

use crate::wizard::draft::OnboardingDraft;
use crate::wizard::navigation::NavigationState;
use crate::wizard::step::Step;

/// Storage key of the persisted draft.
pub const DRAFT_STORAGE_KEY: &str = "onboarding-storage";

/// Version 1 is the unversioned layout written before drafts carried a
/// version tag.
pub const CURRENT_DRAFT_SCHEMA_VERSION: u32 = 2;

/// What survives a restart: the draft and where the partner was.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedDraft {
    pub schema_version: u32,
    pub form_data: OnboardingDraft,
    pub current_step: Step,
    #[serde(default)]
    pub history: Vec<Step>,
}

impl PersistedDraft {
    pub fn capture(draft: &OnboardingDraft, navigation: &NavigationState) -> Self {
        Self {
            schema_version: CURRENT_DRAFT_SCHEMA_VERSION,
            form_data: draft.clone(),
            current_step: navigation.current_step(),
            history: navigation.history().to_vec(),
        }
    }

    /// Navigation rebuilt from the snapshot, with the history repaired if
    /// it was hand-edited or truncated.
    pub fn navigation(&self) -> NavigationState {
        NavigationState::restore(self.current_step, self.history.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::field::{Field, FieldValue};

    #[test]
    fn snapshot_serializes_with_version_and_history() {
        let mut draft = OnboardingDraft::default();
        draft
            .apply(Field::BusinessName, FieldValue::text("Spice Route"))
            .unwrap();
        let mut navigation = NavigationState::new();
        navigation.set_current_step(Step::BusinessProfile);

        let json = serde_json::to_value(PersistedDraft::capture(&draft, &navigation)).unwrap();
        assert_eq!(json["schemaVersion"], 2);
        assert_eq!(json["currentStep"], 3);
        assert_eq!(json["history"], serde_json::json!([1, 3]));
        assert_eq!(json["formData"]["step3"]["businessName"], "Spice Route");
    }

    #[test]
    fn missing_history_is_rebuilt_from_current_step() {
        let persisted: PersistedDraft = serde_json::from_value(serde_json::json!({
            "schemaVersion": 2,
            "formData": {},
            "currentStep": 5
        }))
        .unwrap();
        assert_eq!(persisted.navigation().history(), &[Step::CuisineServices]);
    }
}

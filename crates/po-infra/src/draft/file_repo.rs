use anyhow::{Context, Result};
use async_trait::async_trait;
use po_core::{
    ports::DraftStorePort,
    wizard::{PersistedDraft, CURRENT_DRAFT_SCHEMA_VERSION},
};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

use crate::draft::migration::{schema_version, DraftMigrator};

/// Draft store backed by a single JSON file.
pub struct FileDraftRepository {
    path: PathBuf,
    migrator: DraftMigrator,
}

impl FileDraftRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            migrator: DraftMigrator::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)
                .await
                .with_context(|| format!("create draft dir failed: {}", dir.display()))?;
        }
        Ok(())
    }

    /// Writes to a sibling temp file and renames it over the target, so a
    /// crash leaves either the old draft or the new one.
    async fn atomic_write(&self, content: &str) -> Result<()> {
        self.ensure_parent_dir().await?;

        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, content)
            .await
            .with_context(|| format!("write temp draft failed: {}", tmp_path.display()))?;

        fs::rename(&tmp_path, &self.path).await.with_context(|| {
            format!(
                "rename temp draft to target failed: {} -> {}",
                tmp_path.display(),
                self.path.display()
            )
        })?;

        Ok(())
    }

    /// Drops a draft that cannot be restored so the next session starts clean.
    async fn discard(&self, reason: &str) -> Result<Option<PersistedDraft>> {
        warn!(path = %self.path.display(), reason, "discarding persisted onboarding draft");
        self.clear().await?;
        Ok(None)
    }
}

#[async_trait]
impl DraftStorePort for FileDraftRepository {
    /// Reads the draft, upgrading older layouts and writing the upgraded
    /// form back. Unparseable content, unknown versions and drafts from a
    /// newer build are discarded rather than surfaced as errors.
    async fn load(&self) -> Result<Option<PersistedDraft>> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(s) => s,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("read draft failed: {}", self.path.display()))
            }
        };

        let raw: Value = match serde_json::from_str(&content) {
            Ok(raw) => raw,
            Err(_) => return self.discard("not valid JSON").await,
        };

        let Some(original_version) = schema_version(&raw) else {
            warn!("persisted draft carries an unrecognised schema version");
            return self.discard("unrecognised schema version").await;
        };
        if original_version > CURRENT_DRAFT_SCHEMA_VERSION {
            warn!(
                version = original_version,
                supported = CURRENT_DRAFT_SCHEMA_VERSION,
                "persisted draft was written by a newer build"
            );
            return self.discard("newer schema version").await;
        }

        let migrated = match self.migrator.migrate_to_latest(raw) {
            Ok(migrated) => migrated,
            Err(err) => {
                warn!(error = %err, version = original_version, "draft migration failed");
                return self.discard("migration failed").await;
            }
        };

        let draft: PersistedDraft = match serde_json::from_value(migrated) {
            Ok(draft) => draft,
            Err(err) => {
                warn!(error = %err, "persisted draft does not match the current schema");
                return self.discard("schema mismatch").await;
            }
        };

        if original_version < CURRENT_DRAFT_SCHEMA_VERSION {
            info!(
                from = original_version,
                to = CURRENT_DRAFT_SCHEMA_VERSION,
                "persisted draft migrated"
            );
            self.save(&draft).await?;
        }

        Ok(Some(draft))
    }

    async fn save(&self, draft: &PersistedDraft) -> Result<()> {
        let content = serde_json::to_string_pretty(draft).context("serialize draft failed")?;

        self.atomic_write(&content).await
    }

    async fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path).await {
            Ok(()) => {
                debug!(path = %self.path.display(), "draft file removed");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => {
                Err(e).with_context(|| format!("remove draft failed: {}", self.path.display()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use po_core::wizard::{Field, FieldValue, NavigationState, OnboardingDraft, Step};
    use serde_json::json;
    use tempfile::TempDir;

    fn repo_in(dir: &TempDir) -> FileDraftRepository {
        FileDraftRepository::new(dir.path().join("nested").join("onboarding-storage.json"))
    }

    fn sample_draft() -> PersistedDraft {
        let mut draft = OnboardingDraft::default();
        draft
            .apply(Field::BusinessName, FieldValue::text("Spice Route"))
            .unwrap();
        let mut navigation = NavigationState::new();
        navigation.set_current_step(Step::BusinessProfile);
        PersistedDraft::capture(&draft, &navigation)
    }

    #[tokio::test]
    async fn missing_file_loads_as_none() {
        let dir = TempDir::new().unwrap();
        let repo = repo_in(&dir);

        assert_eq!(repo.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn saved_draft_is_loaded_back() {
        let dir = TempDir::new().unwrap();
        let repo = repo_in(&dir);
        let draft = sample_draft();

        repo.save(&draft).await.unwrap();

        assert_eq!(repo.load().await.unwrap(), Some(draft));
        assert!(!repo.path().with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn clear_removes_file_and_tolerates_absence() {
        let dir = TempDir::new().unwrap();
        let repo = repo_in(&dir);
        repo.save(&sample_draft()).await.unwrap();

        repo.clear().await.unwrap();
        repo.clear().await.unwrap();

        assert!(!repo.path().exists());
        assert_eq!(repo.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn legacy_draft_is_migrated_and_rewritten() {
        let dir = TempDir::new().unwrap();
        let repo = repo_in(&dir);
        std::fs::create_dir_all(repo.path().parent().unwrap()).unwrap();
        let legacy = json!({
            "state": {
                "formData": {
                    "step1": { "firstName": "Asha", "lastName": "Rao", "email": "", "phoneNumber": "" },
                    "step7": { "gstNumber": "22AAAAA0000A1Z5" }
                },
                "currentStep": 7
            },
            "version": 0
        });
        std::fs::write(repo.path(), legacy.to_string()).unwrap();

        let draft = repo.load().await.unwrap().unwrap();

        assert_eq!(draft.schema_version, CURRENT_DRAFT_SCHEMA_VERSION);
        assert_eq!(draft.current_step, Step::Documents);
        assert_eq!(draft.history, vec![Step::Documents]);
        assert_eq!(
            draft.form_data.documents.as_ref().unwrap().gst_number,
            "22AAAAA0000A1Z5"
        );
        let rewritten: Value =
            serde_json::from_str(&std::fs::read_to_string(repo.path()).unwrap()).unwrap();
        assert_eq!(rewritten["schemaVersion"], 2);
    }

    #[tokio::test]
    async fn newer_draft_is_discarded() {
        let dir = TempDir::new().unwrap();
        let repo = repo_in(&dir);
        std::fs::create_dir_all(repo.path().parent().unwrap()).unwrap();
        std::fs::write(
            repo.path(),
            json!({ "schemaVersion": 99, "formData": {}, "currentStep": 1 }).to_string(),
        )
        .unwrap();

        assert_eq!(repo.load().await.unwrap(), None);
        assert!(!repo.path().exists());
    }

    #[tokio::test]
    async fn overflowing_version_tag_is_discarded() {
        let dir = TempDir::new().unwrap();
        let repo = repo_in(&dir);
        std::fs::create_dir_all(repo.path().parent().unwrap()).unwrap();
        std::fs::write(
            repo.path(),
            json!({ "schemaVersion": (1u64 << 32) + 2, "formData": {}, "currentStep": 1, "history": [1] })
                .to_string(),
        )
        .unwrap();

        assert_eq!(repo.load().await.unwrap(), None);
        assert!(!repo.path().exists());
    }

    #[tokio::test]
    async fn corrupt_draft_is_discarded() {
        let dir = TempDir::new().unwrap();
        let repo = repo_in(&dir);
        std::fs::create_dir_all(repo.path().parent().unwrap()).unwrap();
        std::fs::write(repo.path(), "{ not json").unwrap();

        assert_eq!(repo.load().await.unwrap(), None);
        assert!(!repo.path().exists());
    }

    #[tokio::test]
    async fn out_of_range_step_is_discarded() {
        let dir = TempDir::new().unwrap();
        let repo = repo_in(&dir);
        std::fs::create_dir_all(repo.path().parent().unwrap()).unwrap();
        std::fs::write(
            repo.path(),
            json!({ "schemaVersion": 2, "formData": {}, "currentStep": 12 }).to_string(),
        )
        .unwrap();

        assert_eq!(repo.load().await.unwrap(), None);
    }
}

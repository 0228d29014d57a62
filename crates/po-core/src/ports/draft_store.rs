//! Draft persistence port
//!
//! This port defines the contract for persisting and restoring the wizard
//! draft between sessions. Implementations are provided by the infrastructure
//! layer (e.g., file-based storage).

use async_trait::async_trait;

use crate::wizard::PersistedDraft;

#[async_trait]
pub trait DraftStorePort: Send + Sync {
    /// Load the persisted draft, already migrated to the current schema.
    /// `None` when nothing usable is stored.
    async fn load(&self) -> anyhow::Result<Option<PersistedDraft>>;

    async fn save(&self, draft: &PersistedDraft) -> anyhow::Result<()>;

    /// Remove the persisted draft. Clearing an absent draft succeeds.
    async fn clear(&self) -> anyhow::Result<()>;
}

/// One forward step of the persisted draft schema.
///
/// Migrations operate on raw JSON because older layouts do not deserialize
/// into the current types.
pub trait DraftMigrationPort: Send + Sync {
    fn from_version(&self) -> u32;
    fn to_version(&self) -> u32;
    fn migrate(&self, raw: serde_json::Value) -> anyhow::Result<serde_json::Value>;
}

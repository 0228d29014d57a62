//! Persisted draft schema migrations.
//!
//! 草稿结构迁移：在反序列化为当前类型之前，以原始 JSON 逐版本升级。

use anyhow::{anyhow, bail, Result};
use po_core::ports::DraftMigrationPort;
use po_core::wizard::CURRENT_DRAFT_SCHEMA_VERSION;
use serde_json::{json, Map, Value};

const SCHEMA_VERSION_KEY: &str = "schemaVersion";
const FALLBACK_BUSINESS_TYPE: &str = "restaurant";

/// Version of a raw draft. Drafts without a version tag are version 1.
///
/// Returns `None` for a tag that is not a `u32`, e.g. a string or a value
/// past `u32::MAX`.
pub fn schema_version(raw: &Value) -> Option<u32> {
    match raw.get(SCHEMA_VERSION_KEY) {
        None => Some(1),
        Some(tag) => tag.as_u64().and_then(|version| u32::try_from(version).ok()),
    }
}

pub struct DraftMigrator {
    migrations: Vec<Box<dyn DraftMigrationPort>>,
}

impl DraftMigrator {
    pub fn new() -> Self {
        Self {
            migrations: vec![Box::new(V1ToV2Migration)],
        }
    }

    /// Applies migrations until the draft reaches the current version.
    ///
    /// Fails when no migration starts at the draft's version, or when a
    /// migration does not move the version forward.
    pub fn migrate_to_latest(&self, mut raw: Value) -> Result<Value> {
        loop {
            let current = schema_version(&raw)
                .ok_or_else(|| anyhow!("unrecognised draft schema version"))?;
            if current >= CURRENT_DRAFT_SCHEMA_VERSION {
                return Ok(raw);
            }

            let migration = self
                .migrations
                .iter()
                .find(|m| m.from_version() == current)
                .ok_or_else(|| anyhow!("no draft migration from version {}", current))?;

            raw = migration.migrate(raw)?;
            if schema_version(&raw).map_or(true, |next| next <= current) {
                bail!(
                    "draft migration {} -> {} did not advance the schema version",
                    migration.from_version(),
                    migration.to_version()
                );
            }
        }
    }
}

impl Default for DraftMigrator {
    fn default() -> Self {
        Self::new()
    }
}

/// Unversioned drafts kept images/branding as step 6, documents as step 7
/// and payment as step 8, and stored a single business type string.
///
/// The old store may also be wrapped as `{ "state": {...}, "version": 0 }`.
pub struct V1ToV2Migration;

impl V1ToV2Migration {
    fn remap_step(old: u64) -> u64 {
        match old {
            6 => 8,
            7 => 6,
            8 => 7,
            // Past the last step (review screen) lands on the last step.
            n if n > 8 => 8,
            0 => 1,
            n => n,
        }
    }

    fn remap_form_data(old: &Map<String, Value>) -> Map<String, Value> {
        let mut form_data = Map::new();
        for (old_key, new_key) in [
            ("step1", "step1"),
            ("step2", "step2"),
            ("step3", "step3"),
            ("step4", "step4"),
            ("step5", "step5"),
            ("step6", "step8"),
            ("step7", "step6"),
            ("step8", "step7"),
        ] {
            if let Some(record) = old.get(old_key).filter(|v| v.is_object()) {
                form_data.insert(new_key.to_string(), record.clone());
            }
        }

        if let Some(profile) = form_data.get_mut("step3").and_then(Value::as_object_mut) {
            let business_type = match profile.get("businessType") {
                Some(Value::String(kind)) if !kind.trim().is_empty() => json!([kind]),
                Some(Value::Array(kinds)) if !kinds.is_empty() => Value::Array(kinds.clone()),
                _ => json!([FALLBACK_BUSINESS_TYPE]),
            };
            profile.insert("businessType".to_string(), business_type);
        }

        form_data
    }
}

impl DraftMigrationPort for V1ToV2Migration {
    fn from_version(&self) -> u32 {
        1
    }

    fn to_version(&self) -> u32 {
        2
    }

    fn migrate(&self, raw: Value) -> Result<Value> {
        let state = match raw.get("state") {
            Some(inner) if inner.is_object() => inner,
            _ => &raw,
        };
        let state = state
            .as_object()
            .ok_or_else(|| anyhow!("version 1 draft is not a JSON object"))?;

        let form_data = state
            .get("formData")
            .and_then(Value::as_object)
            .map(Self::remap_form_data)
            .unwrap_or_default();
        let current_step = Self::remap_step(
            state
                .get("currentStep")
                .and_then(Value::as_u64)
                .unwrap_or(1),
        );

        Ok(json!({
            "schemaVersion": 2,
            "formData": form_data,
            "currentStep": current_step,
            "history": [current_step],
        }))
    }
}

//! # Pure Data Module / 纯数据模块
//!
//! Configuration DTOs mapped from TOML. No validation and no defaults:
//! a missing value is an empty fact, and wiring decides what it means.

use std::path::PathBuf;

/// Onboarding configuration DTO (pure data, no logic)
/// 引导配置 DTO（纯数据，无逻辑）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnboardingConfig {
    /// Draft file path (may be empty - wiring falls back to the data dir)
    pub draft_path: PathBuf,

    /// Registration API base URL, e.g. `https://api.example.com/api/v1`
    pub registration_base_url: String,

    pub request_timeout_secs: u64,

    pub max_retries: u32,

    pub retry_base_delay_ms: u64,

    /// Upper bound for one submission, including retries
    pub submit_timeout_secs: u64,
}

impl OnboardingConfig {
    /// Create OnboardingConfig from TOML value
    /// 从 TOML 值创建 OnboardingConfig
    ///
    /// Negative integers are read as zero; nothing is range-checked here.
    pub fn from_toml(toml_value: &toml::Value) -> anyhow::Result<Self> {
        let get = |table: &str, key: &str| toml_value.get(table).and_then(|t| t.get(key));
        let int = |table: &str, key: &str| {
            get(table, key)
                .and_then(|v| v.as_integer())
                .unwrap_or(0)
                .max(0)
        };

        Ok(Self {
            draft_path: PathBuf::from(
                get("storage", "draft_path")
                    .and_then(|v| v.as_str())
                    .unwrap_or(""),
            ),
            registration_base_url: get("registration", "base_url")
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string(),
            request_timeout_secs: int("registration", "request_timeout_secs") as u64,
            max_retries: int("registration", "max_retries") as u32,
            retry_base_delay_ms: int("registration", "retry_base_delay_ms") as u64,
            submit_timeout_secs: int("submission", "timeout_secs") as u64,
        })
    }

    /// Create empty OnboardingConfig (all empty/zero values)
    pub fn empty() -> Self {
        Self {
            draft_path: PathBuf::new(),
            registration_base_url: String::new(),
            request_timeout_secs: 0,
            max_retries: 0,
            retry_base_delay_ms: 0,
            submit_timeout_secs: 0,
        }
    }
}

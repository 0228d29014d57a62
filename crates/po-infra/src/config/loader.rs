//! # Configuration Loader / 配置加载器
//!
//! Reads the TOML file and maps it to [`OnboardingConfig`]. Nothing is
//! validated or defaulted here; wiring decides what an empty value means.
//!
//! 仅负责读取与解析，不做校验，也不填默认值。

use anyhow::Context;
use po_core::config::OnboardingConfig;
use std::path::Path;

/// Load configuration from a TOML file
/// 从 TOML 文件加载配置
///
/// # Errors / 错误
///
/// Returns error if the file cannot be read or is not valid TOML.
pub fn load_config(config_path: &Path) -> anyhow::Result<OnboardingConfig> {
    let content = std::fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
    let toml_value: toml::Value =
        toml::from_str(&content).context("Failed to parse config as TOML")?;
    OnboardingConfig::from_toml(&toml_value)
}

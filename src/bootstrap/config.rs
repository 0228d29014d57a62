//! # Configuration Source / 配置来源
//!
//! Picks which TOML file to read. Loading itself lives in `po-infra`;
//! defaults are applied during wiring.

use std::path::{Path, PathBuf};

use po_core::config::OnboardingConfig;
use po_infra::config::load_config;
use tracing::info;

/// Environment variable naming the config file when no argument is given.
pub const CONFIG_ENV_VAR: &str = "PO_CONFIG";

/// The first CLI argument wins over `PO_CONFIG`.
pub fn resolve_config_path(
    cli_arg: Option<String>,
    env_value: Option<String>,
) -> Option<PathBuf> {
    cli_arg
        .or(env_value)
        .filter(|path| !path.trim().is_empty())
        .map(PathBuf::from)
}

/// Loads the named file, or an empty config when no file was named.
///
/// An explicitly named file that cannot be read is an error.
pub fn load_or_empty(path: Option<&Path>) -> anyhow::Result<OnboardingConfig> {
    match path {
        Some(path) => {
            let config = load_config(path)?;
            info!(path = %path.display(), "configuration loaded");
            Ok(config)
        }
        None => {
            info!("no configuration file given, using defaults");
            Ok(OnboardingConfig::empty())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn cli_argument_takes_precedence() {
        assert_eq!(
            resolve_config_path(Some("cli.toml".into()), Some("env.toml".into())),
            Some(PathBuf::from("cli.toml"))
        );
        assert_eq!(
            resolve_config_path(None, Some("env.toml".into())),
            Some(PathBuf::from("env.toml"))
        );
        assert_eq!(resolve_config_path(None, Some("  ".into())), None);
    }

    #[test]
    fn no_path_yields_empty_config() {
        assert_eq!(load_or_empty(None).unwrap(), OnboardingConfig::empty());
    }

    #[test]
    fn named_file_is_loaded() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"[registration]\nbase_url = \"http://localhost:3001\"\n")
            .unwrap();

        let config = load_or_empty(Some(file.path())).unwrap();
        assert_eq!(config.registration_base_url, "http://localhost:3001");
    }

    #[test]
    fn missing_named_file_is_an_error() {
        assert!(load_or_empty(Some(Path::new("/nonexistent/onboarding.toml"))).is_err());
    }
}

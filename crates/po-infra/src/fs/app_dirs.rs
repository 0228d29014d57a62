use std::path::PathBuf;

use po_core::{
    app_dirs::AppDirs,
    ports::{AppDirsError, AppDirsPort},
};

const APP_DIR_NAME: &str = "partner-onboarding";

/// `PO_PROFILE=qa` keeps a second draft next to the default one.
fn resolved_app_dir_name() -> String {
    match std::env::var("PO_PROFILE") {
        Ok(profile) if !profile.is_empty() => format!("{APP_DIR_NAME}-{profile}"),
        _ => APP_DIR_NAME.to_string(),
    }
}

pub struct DirsAppDirsAdapter {
    base_data_dir_override: Option<PathBuf>,
}

impl DirsAppDirsAdapter {
    pub fn new() -> Self {
        Self {
            base_data_dir_override: None,
        }
    }

    /// Adapter rooted at `base` instead of the platform data directory.
    pub fn with_base_data_dir(base: PathBuf) -> Self {
        Self {
            base_data_dir_override: Some(base),
        }
    }

    /// The overridden base if set, otherwise `dirs::data_local_dir()`.
    pub fn base_data_dir(&self) -> Option<PathBuf> {
        if let Some(base) = &self.base_data_dir_override {
            return Some(base.clone());
        }
        dirs::data_local_dir()
    }
}

impl Default for DirsAppDirsAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl AppDirsPort for DirsAppDirsAdapter {
    fn get_app_dirs(&self) -> Result<AppDirs, AppDirsError> {
        let base = self
            .base_data_dir()
            .ok_or(AppDirsError::DataDirUnavailable)?;

        Ok(AppDirs {
            app_data_root: base.join(resolved_app_dir_name()),
        })
    }
}

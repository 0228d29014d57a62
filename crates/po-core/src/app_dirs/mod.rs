use std::path::PathBuf;

use crate::wizard::DRAFT_STORAGE_KEY;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppDirs {
    pub app_data_root: PathBuf,
}

impl AppDirs {
    pub fn draft_file(&self) -> PathBuf {
        self.app_data_root.join(format!("{DRAFT_STORAGE_KEY}.json"))
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.app_data_root.join("logs")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_paths_live_under_data_root() {
        let dirs = AppDirs {
            app_data_root: PathBuf::from("/tmp/partner-onboarding"),
        };
        assert_eq!(
            dirs.draft_file(),
            PathBuf::from("/tmp/partner-onboarding/onboarding-storage.json")
        );
        assert!(dirs.logs_dir().ends_with("logs"));
    }
}

//! Document and image upload port.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::wizard::Field;

/// Remote folder an upload is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadFolder {
    BusinessDocuments,
    LicenseDocuments,
    ProfileImages,
}

impl UploadFolder {
    pub fn as_str(self) -> &'static str {
        match self {
            UploadFolder::BusinessDocuments => "partner-app/business-documents",
            UploadFolder::LicenseDocuments => "partner-app/license-documents",
            UploadFolder::ProfileImages => "partner-app/profile-images",
        }
    }

    /// Folder for an upload-capable field; `None` for every other field.
    pub fn for_field(field: Field) -> Option<UploadFolder> {
        match field {
            Field::FssaiDocument | Field::GstDocument => Some(UploadFolder::LicenseDocuments),
            Field::PanDocument | Field::BankDocument => Some(UploadFolder::BusinessDocuments),
            Field::LogoUrl | Field::BannerUrl => Some(UploadFolder::ProfileImages),
            _ => None,
        }
    }
}

/// A local file the partner picked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub path: PathBuf,
    pub file_name: String,
    pub mime_type: Option<String>,
    pub folder: UploadFolder,
}

#[async_trait]
pub trait UploadPort: Send + Sync {
    /// Stores the file and returns its public URL.
    async fn upload(&self, request: UploadRequest) -> anyhow::Result<String>;
}

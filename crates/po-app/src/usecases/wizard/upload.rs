use std::path::PathBuf;
use std::sync::Arc;

use po_core::ports::{UploadFolder, UploadPort, UploadRequest};
use po_core::wizard::Field;
use tracing::{debug, error};

#[derive(Debug, thiserror::Error)]
pub enum AttachUploadError {
    #[error("field {0} does not accept uploads")]
    NotUploadable(Field),
    #[error("upload failed: {0}")]
    Upload(#[source] anyhow::Error),
}

/// A file picked on the device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFile {
    pub path: PathBuf,
    pub file_name: String,
    pub mime_type: Option<String>,
}

/// Use case for uploading a document or image for a field.
///
/// Only the returned URL is kept; the local file is never persisted.
pub struct AttachUpload {
    upload: Arc<dyn UploadPort>,
}

impl AttachUpload {
    pub fn new(upload: Arc<dyn UploadPort>) -> Self {
        Self { upload }
    }

    pub async fn execute(&self, field: Field, file: LocalFile) -> Result<String, AttachUploadError> {
        let folder = UploadFolder::for_field(field).ok_or(AttachUploadError::NotUploadable(field))?;
        let request = UploadRequest {
            path: file.path,
            file_name: file.file_name,
            mime_type: file.mime_type,
            folder,
        };

        let url = self.upload.upload(request).await.map_err(|err| {
            error!(error = %err, field = %field, folder = folder.as_str(), "upload failed");
            AttachUploadError::Upload(err)
        })?;
        debug!(field = %field, folder = folder.as_str(), "upload stored");
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockUploadPort {
        requests: Mutex<Vec<UploadRequest>>,
    }

    #[async_trait::async_trait]
    impl UploadPort for MockUploadPort {
        async fn upload(&self, request: UploadRequest) -> anyhow::Result<String> {
            let url = format!("https://cdn.example.com/{}/{}", request.folder.as_str(), request.file_name);
            self.requests.lock().unwrap().push(request);
            Ok(url)
        }
    }

    fn file(name: &str) -> LocalFile {
        LocalFile {
            path: PathBuf::from(format!("/tmp/{}", name)),
            file_name: name.to_string(),
            mime_type: Some("application/pdf".to_string()),
        }
    }

    #[tokio::test]
    async fn uploads_into_field_folder() {
        let port = Arc::new(MockUploadPort::default());
        let use_case = AttachUpload::new(port.clone());

        let url = use_case.execute(Field::GstDocument, file("gst.pdf")).await.unwrap();

        assert_eq!(url, "https://cdn.example.com/partner-app/license-documents/gst.pdf");
        assert_eq!(port.requests.lock().unwrap()[0].folder, UploadFolder::LicenseDocuments);
    }

    #[tokio::test]
    async fn rejects_non_upload_fields() {
        let port = Arc::new(MockUploadPort::default());
        let use_case = AttachUpload::new(port.clone());

        let err = use_case.execute(Field::GstNumber, file("gst.pdf")).await.unwrap_err();

        assert!(matches!(err, AttachUploadError::NotUploadable(Field::GstNumber)));
        assert!(port.requests.lock().unwrap().is_empty());
    }
}

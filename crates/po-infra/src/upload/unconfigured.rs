use async_trait::async_trait;
use po_core::ports::{UploadPort, UploadRequest};
use tracing::warn;

/// Upload port for builds without an upload provider. Every upload fails,
/// so the field keeps its previous value and the partner can still finish
/// the wizard without attachments.
#[derive(Debug, Default)]
pub struct UnconfiguredUpload;

#[async_trait]
impl UploadPort for UnconfiguredUpload {
    async fn upload(&self, request: UploadRequest) -> anyhow::Result<String> {
        warn!(folder = request.folder.as_str(), "upload requested but no provider is configured");
        anyhow::bail!("no upload provider is configured")
    }
}

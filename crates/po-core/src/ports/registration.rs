use async_trait::async_trait;

use crate::wizard::{RegistrationError, RegistrationPayload, RegistrationReceipt};

/// Backend partner registration.
#[async_trait]
pub trait RegistrationPort: Send + Sync {
    async fn register(
        &self,
        payload: &RegistrationPayload,
    ) -> Result<RegistrationReceipt, RegistrationError>;
}

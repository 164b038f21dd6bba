use async_trait::async_trait;
use asp_model::{ProvisionEvent, ProvisionResponse};

use crate::error::ApiError;

/// Backend behind the HTTP routes.
///
/// [`crate::ProvisionerAdapter`] is the stock implementation; custom handlers
/// can wrap it with extra checks.
#[async_trait]
pub trait ApiHandler: Send + Sync + 'static {
    /// Provision app slaves for the event's items.
    async fn provision(&self, event: ProvisionEvent) -> Result<ProvisionResponse, ApiError>;
}

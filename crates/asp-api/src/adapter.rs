use std::sync::Arc;

use async_trait::async_trait;
use tracing::{Instrument, info_span};
use uuid::Uuid;

use asp_core::{ProvisionContext, Provisioner, provision_app_slaves};
use asp_model::{ProvisionEvent, ProvisionResponse};

use crate::error::ApiError;
use crate::handler::ApiHandler;

/// Adapter that runs each request through [`provision_app_slaves`].
pub struct ProvisionerAdapter {
    ctx: ProvisionContext,
    provisioner: Arc<dyn Provisioner>,
}

impl ProvisionerAdapter {
    pub fn new(ctx: ProvisionContext, provisioner: Arc<dyn Provisioner>) -> Self {
        Self { ctx, provisioner }
    }
}

#[async_trait]
impl ApiHandler for ProvisionerAdapter {
    async fn provision(&self, event: ProvisionEvent) -> Result<ProvisionResponse, ApiError> {
        let span = info_span!("invocation", id = %Uuid::new_v4());
        provision_app_slaves(event, &self.ctx, Arc::clone(&self.provisioner))
            .instrument(span)
            .await
            .map_err(ApiError::from)
    }
}

//! App-slave provisioning on top of the bounded wait.
//!
//! [`deploy_slaves`] validates the request, issues exactly one scale request
//! through a [`Provisioner`], and waits for it no longer than the context's
//! provisioning deadline. A missed deadline is not fatal: the remote side may
//! still bring the containers up, so the items are decorated anyway and the
//! result carries [`TIMEOUT_MESSAGE`].
mod context;
pub use context::{
    DEFAULT_FUNCTION_TIMEOUT, ENV_FUNCTION_TIMEOUT, ENV_NODE_ENV, ENV_PROJECT,
    ENV_PROVISIONING_TIMEOUT, ENV_RESOLVE_PARTIAL, ENV_SERVICE, ProvisionContext, SAFETY_MARGIN,
};

mod error;
pub use error::{ConfigError, ProvisionError};

use std::sync::Arc;

use async_trait::async_trait;
use asp_model::{
    ProvisionEvent, ProvisionResponse, ProvisionResult, ServicesRequest, SlaveCount,
    TestSessionItem, container_name,
};
use tracing::{debug, info, instrument, warn};

use crate::wait::{PendingOperation, aggregate};

/// Message reported when the scale request outlives the provisioning deadline.
pub const TIMEOUT_MESSAGE: &str = "Timeout exceeded: App Slave container(s) took too long to start. Although they timed out, they may have still started. Also check that docker-compose-ui is up.";

/// Remote service able to start app-slave containers.
///
/// Implementations own their transport (and any transport-level timeout); the
/// provisioning deadline is enforced by the caller.
#[async_trait]
pub trait Provisioner: Send + Sync + 'static {
    /// Name used in logs and diagnostics.
    fn name(&self) -> &'static str;

    /// Ask the remote side to run `request.num` replicas of the service.
    async fn start_services(&self, request: &ServicesRequest) -> Result<(), ProvisionError>;
}

/// Start one app slave per item and return the items decorated with container names.
///
/// Fails before contacting the provisioner if the item count is outside
/// `1..=12`. A remote failure is returned as-is.
#[instrument(
    level = "debug",
    skip_all,
    fields(requested = items.len(), provisioner = provisioner.name())
)]
pub async fn deploy_slaves(
    items: &[TestSessionItem],
    ctx: &ProvisionContext,
    provisioner: Arc<dyn Provisioner>,
) -> Result<ProvisionResult, ProvisionError> {
    let count = SlaveCount::new(items.len())?;
    let request = ServicesRequest::new(ctx.service(), ctx.project(), count);
    debug!(?request, deadline = ?ctx.provisioning_timeout(), "requesting app slaves");

    let pending = PendingOperation::spawn(async move { provisioner.start_services(&request).await });
    let resolved = aggregate(
        vec![pending],
        ctx.provisioning_timeout(),
        ctx.partial_resolution(),
    )
    .await?;

    let error = if resolved.is_complete() {
        info!(count = %count, "app slaves started");
        None
    } else {
        warn!(count = %count, "app slaves did not start before the deadline");
        Some(TIMEOUT_MESSAGE.to_string())
    };

    let items = items
        .iter()
        .enumerate()
        .map(|(i, item)| item.with_container_name(container_name(ctx.project(), ctx.service(), i)))
        .collect();

    Ok(ProvisionResult { items, error })
}

/// Function entry point: deploy the event's items and wrap the result in the response envelope.
pub async fn provision_app_slaves(
    event: ProvisionEvent,
    ctx: &ProvisionContext,
    provisioner: Arc<dyn Provisioner>,
) -> Result<ProvisionResponse, ProvisionError> {
    ctx.log_environment();
    let items = event.provision_via_lambda_dto.items;
    let result = deploy_slaves(&items, ctx, provisioner).await?;
    Ok(result.into())
}

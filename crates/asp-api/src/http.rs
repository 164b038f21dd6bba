use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use tracing::debug;

use asp_model::ProvisionEvent;

use crate::{error::ApiError, handler::ApiHandler};

/// HTTP API service builder.
pub struct HttpApi<H> {
    handler: Arc<H>,
}

impl<H> HttpApi<H>
where
    H: ApiHandler,
{
    pub fn new(handler: Arc<H>) -> Self {
        Self { handler }
    }

    /// Build axum router with mounted endpoints.
    ///
    /// Routes:
    /// - POST /api/v1/provision - provision app slaves for an invocation event
    /// - GET /api/v1/health - liveness probe
    pub fn router(self) -> Router {
        Router::new()
            .route("/api/v1/provision", post(provision::<H>))
            .route("/api/v1/health", get(health))
            .with_state(self.handler)
    }
}

/// POST /api/v1/provision
async fn provision<H>(
    State(handler): State<Arc<H>>,
    Json(event): Json<ProvisionEvent>,
) -> Result<impl IntoResponse, ApiError>
where
    H: ApiHandler,
{
    debug!(
        items = event.provision_via_lambda_dto.items.len(),
        "provision request received"
    );
    let response = handler.provision(event).await?;
    Ok(Json(response))
}

/// GET /api/v1/health
async fn health() -> StatusCode {
    StatusCode::OK
}

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use asp_core::ProvisionError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("upstream failure: {0}")]
    Upstream(String),

    #[error("timed out: {0}")]
    Timeout(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ProvisionError> for ApiError {
    fn from(e: ProvisionError) -> Self {
        let msg = e.to_string();
        match e {
            ProvisionError::Validation(_) => ApiError::InvalidRequest(msg),
            ProvisionError::Remote { .. } | ProvisionError::Transport(_) => ApiError::Upstream(msg),
            ProvisionError::Timeout { .. } => ApiError::Timeout(msg),
            ProvisionError::Internal(_) => ApiError::Internal(msg),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use asp_model::SlaveCount;

    #[test]
    fn provision_errors_map_to_statuses() {
        let validation = ApiError::from(ProvisionError::from(SlaveCount::new(0).unwrap_err()));
        assert_eq!(validation.status(), StatusCode::BAD_REQUEST);

        let remote = ApiError::from(ProvisionError::Remote {
            status: 500,
            message: "boom".into(),
        });
        assert_eq!(remote.status(), StatusCode::BAD_GATEWAY);

        let timeout = ApiError::from(ProvisionError::Timeout {
            completed: 0,
            total: 1,
        });
        assert_eq!(timeout.status(), StatusCode::GATEWAY_TIMEOUT);
    }
}

use thiserror::Error;

use asp_model::ModelError;

use crate::wait::AggregateError;

#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error(transparent)]
    Validation(#[from] ModelError),

    #[error("remote provisioning failed with status {status}: {message}")]
    Remote { status: u16, message: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("not all operations completed within the specified time ({completed}/{total} finished)")]
    Timeout { completed: usize, total: usize },

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<AggregateError<ProvisionError>> for ProvisionError {
    fn from(e: AggregateError<ProvisionError>) -> Self {
        match e {
            AggregateError::Operation { source, .. } => source,
            AggregateError::Timeout { completed, total } => {
                ProvisionError::Timeout { completed, total }
            }
            other @ (AggregateError::Join { .. } | AggregateError::Interrupted) => {
                ProvisionError::Internal(other.to_string())
            }
        }
    }
}

/// Malformed provisioning configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?} ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

//! docker-compose-ui backed [`asp_core::Provisioner`].
mod client;
pub use client::ComposeUiClient;

mod config;
pub use config::{ComposeUiConfig, DEFAULT_BASE_URL, ENV_BASE_URL, ENV_REQUEST_TIMEOUT};

mod error;
pub use error::ComposeError;

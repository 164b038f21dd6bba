use thiserror::Error;

#[derive(Debug, Error)]
pub enum ComposeError {
    #[error("invalid value for {key}: {value:?} ({reason})")]
    InvalidConfig {
        key: &'static str,
        value: String,
        reason: &'static str,
    },

    #[error("failed to build http client: {0}")]
    Client(#[from] reqwest::Error),
}

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error(
        "The number of app-slaves requested was: {requested}. The supported number of Test Sessions is from {min}-{max} inclusive."
    )]
    InvalidSlaveCount {
        requested: usize,
        min: usize,
        max: usize,
    },

    #[error("invalid model: {0}")]
    Invalid(String),
}

pub type ModelResult<T> = Result<T, ModelError>;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    MAX_SLAVES, MIN_SLAVES,
    error::{ModelError, ModelResult},
};

/// Number of app slaves in one request, always within `MIN_SLAVES..=MAX_SLAVES`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct SlaveCount(usize);

impl SlaveCount {
    /// Validate a requested count.
    pub fn new(requested: usize) -> ModelResult<Self> {
        if (MIN_SLAVES..=MAX_SLAVES).contains(&requested) {
            Ok(Self(requested))
        } else {
            Err(ModelError::InvalidSlaveCount {
                requested,
                min: MIN_SLAVES,
                max: MAX_SLAVES,
            })
        }
    }

    #[inline]
    pub const fn get(&self) -> usize {
        self.0
    }
}

impl TryFrom<usize> for SlaveCount {
    type Error = ModelError;
    fn try_from(n: usize) -> Result<Self, Self::Error> {
        Self::new(n)
    }
}

impl From<SlaveCount> for usize {
    fn from(c: SlaveCount) -> Self {
        c.0
    }
}

impl fmt::Display for SlaveCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

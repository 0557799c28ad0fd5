use std::{fmt, str::FromStr};

use crate::ModelError;

/// Resolution step used when a range query does not specify one.
pub const DEFAULT_STEP: &str = "1m";

/// Range query resolution step.
///
/// Passed to the server unchanged: either a duration (`"15s"`, `"1m"`) or a float number of seconds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step(String);

impl Step {
    pub fn new(step: impl Into<String>) -> Result<Self, ModelError> {
        let step = step.into();
        let trimmed = step.trim();
        if trimmed.is_empty() {
            return Err(ModelError::EmptyStep);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Step {
    fn default() -> Self {
        Self(DEFAULT_STEP.to_string())
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Step {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Step::new(s)
    }
}

use std::{fmt, str::FromStr};

use crate::ModelError;

/// Filter values understood by `/api/v1/targets?state=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetState {
    Active,
    Dropped,
    Any,
}

impl TargetState {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetState::Active => "active",
            TargetState::Dropped => "dropped",
            TargetState::Any => "any",
        }
    }
}

impl fmt::Display for TargetState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetState {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(TargetState::Active),
            "dropped" => Ok(TargetState::Dropped),
            "any" => Ok(TargetState::Any),
            _ => Err(ModelError::InvalidTargetState(s.to_string())),
        }
    }
}

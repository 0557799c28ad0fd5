use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::ModelError;

/// Shape of `data.result` in an expression query response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultType {
    /// Instant vector: a list of series with one `value` each.
    Vector,
    /// Range vector: a list of series with `values`.
    Matrix,
    /// A single `[timestamp, "value"]` pair.
    Scalar,
    /// A single `[timestamp, "string"]` pair.
    String,
}

impl ResultType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResultType::Vector => "vector",
            ResultType::Matrix => "matrix",
            ResultType::Scalar => "scalar",
            ResultType::String => "string",
        }
    }

    /// Returns `true` if `data.result` is a list of series objects.
    pub fn is_series(&self) -> bool {
        matches!(self, ResultType::Vector | ResultType::Matrix)
    }
}

impl fmt::Display for ResultType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResultType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "vector" => Ok(ResultType::Vector),
            "matrix" => Ok(ResultType::Matrix),
            "scalar" => Ok(ResultType::Scalar),
            "string" => Ok(ResultType::String),
            _ => Err(ModelError::InvalidResultType(s.to_string())),
        }
    }
}

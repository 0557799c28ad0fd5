use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("query expression cannot be empty")]
    EmptyQuery,
    #[error("step cannot be empty")]
    EmptyStep,
    #[error("invalid target state: {0} (expected: active|dropped|any)")]
    InvalidTargetState(String),
    #[error("invalid result type: {0} (expected: vector|matrix|scalar|string)")]
    InvalidResultType(String),
}

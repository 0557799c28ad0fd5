//! Client for the Prometheus HTTP API.
//!
//! [`QueryClient`] issues instant and range queries (singly or as concurrent batches) and the
//! metadata calls (labels, label values, targets, rules, alerts, alertmanagers) against one
//! server. Expression results are normalized into [`ResultItem`]s annotated with the request
//! that produced them; metadata calls return the decoded envelope as an [`ApiResponse`].
//!
//! Every failure is an [`ApiError`]; [`ApiError::kind`] tells transport/format problems,
//! server-reported errors and HTTP status errors apart. Nothing is retried.
//!
//! ## Features
//! - `blocking` - [`blocking::QueryClient`], the same operations as blocking calls.

mod classify;
mod normalize;

mod client;
pub use client::QueryClient;

mod config;
pub use config::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};

mod error;
pub use error::{ApiError, ErrorKind};

mod response;
pub use response::ApiResponse;

#[cfg(feature = "blocking")]
pub mod blocking;

pub use promq_model::{
    DEFAULT_STEP, DEFAULT_WINDOW_SECS, FormParams, QuerySpec, RangeSpec, ResultItem, ResultType,
    Sample, Step, TargetState, TimeRange, Timestamp, unix_now,
};

pub mod prelude {
    pub use crate::error::{ApiError, ErrorKind};
    pub use crate::{ApiResponse, ClientConfig, QueryClient};
    pub use promq_model::{QuerySpec, ResultItem, TargetState, Timestamp};
}

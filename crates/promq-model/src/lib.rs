//! Typed request and response records for the Prometheus HTTP API.
//!
//! Requests are described by [`QuerySpec`] and [`RangeSpec`] and rendered into [`FormParams`],
//! the exact key/value list sent to the server. Series returned by `/api/v1/query` and
//! `/api/v1/query_range` are decoded into [`ResultItem`], annotated with the parameters of the
//! request that produced them.

mod domain;
pub use domain::*;

mod error;
pub use error::ModelError;

//! Logging setup for promq binaries and tests.
//!
//! The client crates only emit `tracing` events; this crate installs the global subscriber.

mod logger;
pub use logger::*;

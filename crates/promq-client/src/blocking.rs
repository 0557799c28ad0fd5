//! Blocking wrapper around [`crate::QueryClient`].
//!
//! Each call drives the async client to completion on a private current-thread runtime, so the
//! calling thread suspends for the network round trip(s). Batched calls still dispatch their
//! requests concurrently. Must not be used from inside an async runtime.

use std::sync::Arc;

use tokio::runtime::{Builder, Runtime};

use promq_model::{QuerySpec, ResultItem, Timestamp};

use crate::{ApiError, ApiResponse, ClientConfig};

#[derive(Debug, Clone)]
pub struct QueryClient {
    inner: crate::QueryClient,
    runtime: Arc<Runtime>,
}

impl QueryClient {
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> Result<Self, ApiError> {
        Self::from_config(ClientConfig::new(base_url).with_timeout_secs(timeout_secs))
    }

    pub fn from_config(cfg: ClientConfig) -> Result<Self, ApiError> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(ApiError::Runtime)?;
        let inner = crate::QueryClient::from_config(cfg)?;
        Ok(Self {
            inner,
            runtime: Arc::new(runtime),
        })
    }

    /// The async client this wrapper drives.
    pub fn inner(&self) -> &crate::QueryClient {
        &self.inner
    }

    pub fn query(&self, query: &str, time: Option<Timestamp>) -> Result<Vec<ResultItem>, ApiError> {
        self.runtime.block_on(self.inner.query(query, time))
    }

    pub fn queries<I, Q>(
        &self,
        queries: I,
        time: Option<Timestamp>,
    ) -> Result<Vec<Vec<ResultItem>>, ApiError>
    where
        I: IntoIterator<Item = Q>,
        Q: Into<QuerySpec>,
    {
        self.runtime.block_on(self.inner.queries(queries, time))
    }

    pub fn query_range(
        &self,
        query: &str,
        start: Option<Timestamp>,
        end: Option<Timestamp>,
        step: Option<&str>,
    ) -> Result<Vec<ResultItem>, ApiError> {
        self.runtime
            .block_on(self.inner.query_range(query, start, end, step))
    }

    pub fn queries_range<I, Q>(
        &self,
        queries: I,
        start: Option<Timestamp>,
        end: Option<Timestamp>,
        step: Option<&str>,
    ) -> Result<Vec<Vec<ResultItem>>, ApiError>
    where
        I: IntoIterator<Item = Q>,
        Q: Into<QuerySpec>,
    {
        self.runtime
            .block_on(self.inner.queries_range(queries, start, end, step))
    }

    pub fn labels(
        &self,
        start: Option<Timestamp>,
        end: Option<Timestamp>,
    ) -> Result<ApiResponse, ApiError> {
        self.runtime.block_on(self.inner.labels(start, end))
    }

    pub fn label_values(
        &self,
        label_name: &str,
        start: Option<Timestamp>,
        end: Option<Timestamp>,
        matchers: &[&str],
    ) -> Result<ApiResponse, ApiError> {
        self.runtime
            .block_on(self.inner.label_values(label_name, start, end, matchers))
    }

    pub fn targets(&self, state: Option<&str>) -> Result<ApiResponse, ApiError> {
        self.runtime.block_on(self.inner.targets(state))
    }

    pub fn rules(&self) -> Result<ApiResponse, ApiError> {
        self.runtime.block_on(self.inner.rules())
    }

    pub fn alerts(&self) -> Result<ApiResponse, ApiError> {
        self.runtime.block_on(self.inner.alerts())
    }

    pub fn alertmanagers(&self) -> Result<ApiResponse, ApiError> {
        self.runtime.block_on(self.inner.alertmanagers())
    }
}

use std::time::Duration;

use futures::future::try_join_all;
use reqwest::{
    Method, Url,
    header::{CONTENT_TYPE, HeaderMap, HeaderValue},
};
use serde_json::{Map, Value};
use tracing::{debug, trace};

use promq_model::{
    FormParams, QuerySpec, RangeSpec, ResultItem, Step, TimeRange, Timestamp, unix_now,
};

use crate::{
    classify::classify, config::ClientConfig, error::ApiError, normalize::extract_results,
    response::ApiResponse,
};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

const QUERY: &[&str] = &["api", "v1", "query"];
const QUERY_RANGE: &[&str] = &["api", "v1", "query_range"];
const LABELS: &[&str] = &["api", "v1", "labels"];
const TARGETS: &[&str] = &["api", "v1", "targets"];
const RULES: &[&str] = &["api", "v1", "rules"];
const ALERTS: &[&str] = &["api", "v1", "alerts"];
const ALERTMANAGERS: &[&str] = &["api", "v1", "alertmanagers"];

/// Client for the Prometheus HTTP API.
///
/// Holds only immutable configuration; every call builds its own requests, so one client can
/// be cloned and shared across tasks.
///
/// ```no_run
/// # async fn run() -> Result<(), promq_client::ApiError> {
/// use promq_client::{QueryClient, QuerySpec};
///
/// let client = QueryClient::new("http://localhost:9090", 30)?;
/// let up = client.query("up", None).await?;
///
/// let groups = client
///     .queries([QuerySpec::new("up"), QuerySpec::new("up").with_label("dedup", "true")], None)
///     .await?;
/// assert_eq!(groups.len(), 2);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct QueryClient {
    base_url: Url,
    /// Base URL as the caller wrote it, used in error messages.
    shown_base: String,
    timeout: Duration,
    http: reqwest::Client,
}

impl QueryClient {
    /// Create a client for `base_url` with a per-request timeout in seconds.
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> Result<Self, ApiError> {
        Self::from_config(ClientConfig::new(base_url).with_timeout_secs(timeout_secs))
    }

    pub fn from_config(cfg: ClientConfig) -> Result<Self, ApiError> {
        let base_url = parse_base_url(&cfg.base_url)?;
        let shown_base = shown_base_url(&cfg.base_url);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(FORM_CONTENT_TYPE));

        let mut builder = reqwest::Client::builder()
            .timeout(cfg.timeout)
            .default_headers(headers);
        if let Some(user_agent) = &cfg.user_agent {
            builder = builder.user_agent(user_agent.as_str());
        }
        let http = builder.build().map_err(ApiError::ClientBuild)?;

        debug!(base_url = %base_url, timeout = ?cfg.timeout, "query client created");
        Ok(Self {
            base_url,
            shown_base,
            timeout: cfg.timeout,
            http,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    // ------------------------------------------------------------------------
    // Expression queries
    // ------------------------------------------------------------------------

    /// Evaluate `query` at `time` (default: now).
    ///
    /// POST /api/v1/query
    pub async fn query(
        &self,
        query: &str,
        time: Option<Timestamp>,
    ) -> Result<Vec<ResultItem>, ApiError> {
        let params = QuerySpec::new(query).to_params(time.unwrap_or_else(unix_now))?;
        self.fetch_results(QUERY, &params).await
    }

    /// Evaluate several instant queries concurrently.
    ///
    /// Returns one group per input, in input order. The first failing request aborts the call
    /// with [`ApiError::Dispatch`] naming that request.
    pub async fn queries<I, Q>(
        &self,
        queries: I,
        time: Option<Timestamp>,
    ) -> Result<Vec<Vec<ResultItem>>, ApiError>
    where
        I: IntoIterator<Item = Q>,
        Q: Into<QuerySpec>,
    {
        let time = time.unwrap_or_else(unix_now);
        let batch = queries
            .into_iter()
            .map(|q| q.into().to_params(time))
            .collect::<Result<Vec<_>, _>>()?;
        self.fetch_batch(QUERY, batch).await
    }

    /// Evaluate `query` over `[start, end]` (default: the last 24 hours) every `step` (default: `1m`).
    ///
    /// POST /api/v1/query_range
    pub async fn query_range(
        &self,
        query: &str,
        start: Option<Timestamp>,
        end: Option<Timestamp>,
        step: Option<&str>,
    ) -> Result<Vec<ResultItem>, ApiError> {
        let params = RangeSpec::new(query)
            .with_start(start)
            .with_end(end)
            .with_step(parse_step(step)?)
            .to_params(unix_now())?;
        self.fetch_results(QUERY_RANGE, &params).await
    }

    /// Evaluate several range queries concurrently over the same window.
    ///
    /// Batching semantics match [`QueryClient::queries`].
    pub async fn queries_range<I, Q>(
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
        let step = parse_step(step)?;
        let now = unix_now();
        let batch = queries
            .into_iter()
            .map(|q| {
                RangeSpec::from_query(q.into())
                    .with_start(start)
                    .with_end(end)
                    .with_step(step.clone())
                    .to_params(now)
            })
            .collect::<Result<Vec<_>, _>>()?;
        self.fetch_batch(QUERY_RANGE, batch).await
    }

    // ------------------------------------------------------------------------
    // Metadata
    // ------------------------------------------------------------------------

    /// List label names seen in `[start, end]` (default: the last 24 hours).
    ///
    /// POST /api/v1/labels
    pub async fn labels(
        &self,
        start: Option<Timestamp>,
        end: Option<Timestamp>,
    ) -> Result<ApiResponse, ApiError> {
        let mut params = FormParams::new();
        TimeRange::resolve(start, end, unix_now()).apply(&mut params);
        self.fetch_raw(Method::POST, LABELS, &params).await
    }

    /// List values of `label_name`, optionally restricted to series matching `matchers`.
    ///
    /// GET /api/v1/label/{label_name}/values
    pub async fn label_values(
        &self,
        label_name: &str,
        start: Option<Timestamp>,
        end: Option<Timestamp>,
        matchers: &[&str],
    ) -> Result<ApiResponse, ApiError> {
        if label_name.trim().is_empty() {
            return Err(ApiError::InvalidRequest("label name cannot be empty".into()));
        }

        let mut params = FormParams::new();
        TimeRange::resolve(start, end, unix_now()).apply(&mut params);
        for matcher in matchers {
            params.push("match[]", matcher);
        }
        let path = ["api", "v1", "label", label_name, "values"];
        self.fetch_raw(Method::GET, &path, &params).await
    }

    /// Current state of target discovery, optionally filtered by `state`.
    ///
    /// POST /api/v1/targets
    pub async fn targets(&self, state: Option<&str>) -> Result<ApiResponse, ApiError> {
        let mut params = FormParams::new();
        if let Some(state) = state.filter(|s| !s.is_empty()) {
            params.set("state", state);
        }
        self.fetch_raw(Method::POST, TARGETS, &params).await
    }

    /// Loaded alerting and recording rules.
    ///
    /// POST /api/v1/rules
    pub async fn rules(&self) -> Result<ApiResponse, ApiError> {
        self.fetch_raw(Method::POST, RULES, &FormParams::new()).await
    }

    /// Active alerts.
    ///
    /// POST /api/v1/alerts
    pub async fn alerts(&self) -> Result<ApiResponse, ApiError> {
        self.fetch_raw(Method::POST, ALERTS, &FormParams::new()).await
    }

    /// Current state of alertmanager discovery.
    ///
    /// POST /api/v1/alertmanagers
    pub async fn alertmanagers(&self) -> Result<ApiResponse, ApiError> {
        self.fetch_raw(Method::POST, ALERTMANAGERS, &FormParams::new())
            .await
    }

    // ------------------------------------------------------------------------
    // Dispatch
    // ------------------------------------------------------------------------

    async fn fetch_batch(
        &self,
        path: &[&str],
        batch: Vec<FormParams>,
    ) -> Result<Vec<Vec<ResultItem>>, ApiError> {
        debug!(count = batch.len(), path = %path.join("/"), "dispatching batch");

        let requests = batch.into_iter().map(|params| async move {
            let result = self.fetch_results(path, &params).await;
            result.map_err(|source| ApiError::Dispatch {
                request: params,
                source: Box::new(source),
            })
        });
        try_join_all(requests).await
    }

    async fn fetch_results(
        &self,
        path: &[&str],
        params: &FormParams,
    ) -> Result<Vec<ResultItem>, ApiError> {
        let url = self.endpoint(path)?;
        let shown = self.shown_url(path);
        let (_, envelope) = self.execute(Method::POST, &url, &shown, params).await?;
        let items = extract_results(&shown, envelope, Some(params))?;
        trace!(%url, items = items.len(), "results extracted");
        Ok(items)
    }

    async fn fetch_raw(
        &self,
        method: Method,
        path: &[&str],
        params: &FormParams,
    ) -> Result<ApiResponse, ApiError> {
        let url = self.endpoint(path)?;
        let shown = self.shown_url(path);
        let (status, envelope) = self.execute(method, &url, &shown, params).await?;
        Ok(ApiResponse::new(shown, status, envelope))
    }

    async fn execute(
        &self,
        method: Method,
        url: &Url,
        shown: &str,
        params: &FormParams,
    ) -> Result<(u16, Map<String, Value>), ApiError> {
        debug!(%method, %url, "sending request");
        trace!(%url, %params, "request params");

        let request = if method == Method::GET {
            self.http.get(url.clone()).query(params.as_slice())
        } else {
            self.http
                .request(method, url.clone())
                .form(params.as_slice())
        };

        let transport = |source| ApiError::Transport {
            url: shown.to_string(),
            source,
        };
        let response = request.send().await.map_err(transport)?;
        let status = response.status();
        let body = response.text().await.map_err(transport)?;
        trace!(%url, %status, bytes = body.len(), "response received");

        let envelope = classify(shown, status, &body)?;
        Ok((status.as_u16(), envelope))
    }

    fn endpoint(&self, path: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidRequest(format!("unusable base url: {}", self.base_url)))?
            .pop_if_empty()
            .extend(path);
        Ok(url)
    }

    fn shown_url(&self, path: &[&str]) -> String {
        format!("{}/{}", self.shown_base, path.join("/"))
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ApiError> {
    let mut url = Url::parse(raw.trim())
        .map_err(|e| ApiError::InvalidRequest(format!("invalid base url '{raw}': {e}")))?;

    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(ApiError::InvalidRequest(format!(
            "invalid base url '{raw}': expected http(s)://host[:port][/prefix]"
        )));
    }
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

fn shown_base_url(raw: &str) -> String {
    let raw = raw.trim();
    let end = raw.find(['?', '#']).unwrap_or(raw.len());
    raw[..end].trim_end_matches('/').to_string()
}

fn parse_step(step: Option<&str>) -> Result<Step, ApiError> {
    match step {
        Some(step) => Ok(Step::new(step)?),
        None => Ok(Step::default()),
    }
}

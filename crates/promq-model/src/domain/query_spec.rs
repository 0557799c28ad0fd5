use crate::{FormParams, ModelError, Timestamp};

/// One instant query: expression, extra label parameters and an optional evaluation time.
///
/// Batched calls accept any one type convertible into a `QuerySpec`: plain strings, or specs
/// built with [`QuerySpec::with_label`] when some queries need extra parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySpec {
    query: String,
    labels: FormParams,
    time: Option<Timestamp>,
}

impl QuerySpec {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            labels: FormParams::new(),
            time: None,
        }
    }

    /// Add an extra parameter merged into the request body.
    ///
    /// Labels are applied after `query`/`time`, so a label with one of those names overrides it.
    pub fn with_label<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: ToString,
    {
        self.labels.set(key, value);
        self
    }

    pub fn with_labels<I, K, V>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: ToString,
    {
        for (key, value) in labels {
            self.labels.set(key, value);
        }
        self
    }

    /// Pin the evaluation time, overriding the call-level default.
    pub fn at(mut self, time: Timestamp) -> Self {
        self.time = Some(time);
        self
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn labels(&self) -> &FormParams {
        &self.labels
    }

    pub fn time(&self) -> Option<Timestamp> {
        self.time
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        if self.query.trim().is_empty() {
            return Err(ModelError::EmptyQuery);
        }
        Ok(())
    }

    /// Render the `/api/v1/query` body: `query`, `time`, then the labels.
    pub fn to_params(&self, default_time: Timestamp) -> Result<FormParams, ModelError> {
        self.validate()?;

        let mut params = FormParams::new();
        params.set("query", &self.query);
        params.set("time", self.time.unwrap_or(default_time));
        params.merge(&self.labels);
        Ok(params)
    }
}

impl From<&str> for QuerySpec {
    fn from(query: &str) -> Self {
        QuerySpec::new(query)
    }
}

impl From<String> for QuerySpec {
    fn from(query: String) -> Self {
        QuerySpec::new(query)
    }
}

impl From<&String> for QuerySpec {
    fn from(query: &String) -> Self {
        QuerySpec::new(query.as_str())
    }
}

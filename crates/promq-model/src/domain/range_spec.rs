use crate::{FormParams, ModelError, QuerySpec, Step, TimeRange, Timestamp};

/// One range query: expression, extra labels, optional window bounds and a step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeSpec {
    query: String,
    labels: FormParams,
    start: Option<Timestamp>,
    end: Option<Timestamp>,
    step: Step,
}

impl RangeSpec {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            labels: FormParams::new(),
            start: None,
            end: None,
            step: Step::default(),
        }
    }

    /// Build a range spec from an instant spec, keeping its query and labels.
    ///
    /// The instant evaluation time is not used by range queries and is dropped.
    pub fn from_query(spec: QuerySpec) -> Self {
        Self {
            labels: spec.labels().clone(),
            ..RangeSpec::new(spec.query())
        }
    }

    pub fn with_label<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: ToString,
    {
        self.labels.set(key, value);
        self
    }

    pub fn with_start(mut self, start: Option<Timestamp>) -> Self {
        self.start = start;
        self
    }

    pub fn with_end(mut self, end: Option<Timestamp>) -> Self {
        self.end = end;
        self
    }

    pub fn with_step(mut self, step: Step) -> Self {
        self.step = step;
        self
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn labels(&self) -> &FormParams {
        &self.labels
    }

    pub fn step(&self) -> &Step {
        &self.step
    }

    pub fn range(&self, now: Timestamp) -> TimeRange {
        TimeRange::resolve(self.start, self.end, now)
    }

    /// Render the `/api/v1/query_range` body: `query`, `start`, `end`, `step`, then the labels.
    pub fn to_params(&self, now: Timestamp) -> Result<FormParams, ModelError> {
        if self.query.trim().is_empty() {
            return Err(ModelError::EmptyQuery);
        }

        let mut params = FormParams::new();
        params.set("query", &self.query);
        self.range(now).apply(&mut params);
        params.set("step", &self.step);
        params.merge(&self.labels);
        Ok(params)
    }
}

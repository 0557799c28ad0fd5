use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{FormParams, Sample};

/// One series (or scalar) returned for an expression query.
///
/// Instant vectors fill `value`, range vectors fill `values`. Fields the server sends that are
/// not modelled here (native histograms, for example) are kept in `extra`.
/// `request` holds the parameters of the request that produced this item, which is how results
/// of a batched call are correlated back to their inputs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultItem {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metric: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Sample>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<Sample>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<FormParams>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ResultItem {
    /// Item for a `scalar` or `string` result, which carries no labels.
    pub fn from_sample(sample: Sample) -> Self {
        Self {
            value: Some(sample),
            ..Default::default()
        }
    }

    pub fn with_request(mut self, request: FormParams) -> Self {
        self.request = Some(request);
        self
    }

    /// Metric name (`__name__` label), if the series has one.
    pub fn name(&self) -> Option<&str> {
        self.label("__name__")
    }

    pub fn label(&self, key: &str) -> Option<&str> {
        self.metric.get(key).map(String::as_str)
    }

    /// Query expression this item was produced by.
    pub fn query(&self) -> Option<&str> {
        self.request.as_ref().and_then(|r| r.get("query"))
    }
}

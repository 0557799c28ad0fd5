use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::ApiError;

/// Decoded response of a metadata endpoint (labels, targets, rules, ...).
///
/// The envelope is returned as the server sent it, after error classification.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    url: String,
    http_status: u16,
    body: Map<String, Value>,
}

impl ApiResponse {
    pub(crate) fn new(url: String, http_status: u16, body: Map<String, Value>) -> Self {
        Self {
            url,
            http_status,
            body,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn http_status(&self) -> u16 {
        self.http_status
    }

    /// Envelope `status` field (`"success"` or `"error"`).
    pub fn status(&self) -> Option<&str> {
        self.body.get("status").and_then(Value::as_str)
    }

    pub fn is_success(&self) -> bool {
        self.status() == Some("success")
    }

    pub fn data(&self) -> Option<&Value> {
        self.body.get("data")
    }

    /// Non-fatal warnings attached by the server.
    pub fn warnings(&self) -> Vec<&str> {
        self.body
            .get("warnings")
            .and_then(Value::as_array)
            .map(|w| w.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    pub fn body(&self) -> &Map<String, Value> {
        &self.body
    }

    pub fn into_body(self) -> Map<String, Value> {
        self.body
    }

    /// Decode `data` into a caller-chosen type, e.g. `Vec<String>` for label names.
    pub fn data_as<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        let data = self.data().ok_or_else(|| ApiError::MalformedResponse {
            url: self.url.clone(),
            reason: "response has no data".into(),
        })?;
        serde_json::from_value(data.clone()).map_err(|e| ApiError::MalformedResponse {
            url: self.url.clone(),
            reason: format!("failed to decode data: {e}"),
        })
    }
}

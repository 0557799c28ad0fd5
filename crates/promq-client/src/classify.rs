use reqwest::StatusCode;
use serde_json::{Map, Value};
use tracing::warn;

use crate::error::ApiError;

/// Turn a raw HTTP response into the decoded JSON envelope or a classified error.
///
/// Checks run in order: body is JSON, body is an object, body carries both `errorType` and
/// `error`, status is below 400.
pub(crate) fn classify(
    url: &str,
    status: StatusCode,
    body: &str,
) -> Result<Map<String, Value>, ApiError> {
    let value: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(_) => {
            warn!(%url, %status, "response body is not json");
            return Err(ApiError::UnsupportedResponse {
                url: url.to_string(),
                status: status.as_u16(),
                body: body.to_string(),
            });
        }
    };

    let Value::Object(envelope) = value else {
        warn!(%url, %status, "response body is not a json object");
        return Err(ApiError::NonObjectResponse {
            url: url.to_string(),
            status: status.as_u16(),
            body: value.to_string(),
        });
    };

    if let (Some(error_type), Some(error)) = (envelope.get("errorType"), envelope.get("error")) {
        let error_type = as_text(error_type);
        let error = as_text(error);
        warn!(%url, %status, %error_type, %error, "server reported error");
        return Err(ApiError::Server {
            url: url.to_string(),
            status: status.as_u16(),
            error_type,
            error,
        });
    }

    if status.as_u16() >= 400 {
        warn!(%url, %status, "request failed with http status");
        return Err(ApiError::Status {
            url: url.to_string(),
            status: status.as_u16(),
            message: status.canonical_reason().unwrap_or("unknown").to_string(),
        });
    }

    Ok(envelope)
}

fn as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

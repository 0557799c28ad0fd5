use serde_json::{Map, Value};

use promq_model::{FormParams, ResultItem, ResultType, Sample};

use crate::error::ApiError;

/// Extract `data.result` from a success envelope.
///
/// Series results are decoded one item per element. Scalar and string results become a single
/// item. When `request` is known it is attached to every item.
pub(crate) fn extract_results(
    url: &str,
    mut envelope: Map<String, Value>,
    request: Option<&FormParams>,
) -> Result<Vec<ResultItem>, ApiError> {
    let malformed = |reason: String| ApiError::MalformedResponse {
        url: url.to_string(),
        reason,
    };

    let mut data = match envelope.remove("data") {
        Some(Value::Object(data)) => data,
        Some(_) => return Err(malformed("data is not an object".into())),
        None => return Err(malformed("response has no data".into())),
    };

    let result_type = match data.get("resultType").and_then(Value::as_str) {
        Some(s) => Some(
            s.parse::<ResultType>()
                .map_err(|e| malformed(e.to_string()))?,
        ),
        None => None,
    };
    let result = data
        .remove("result")
        .ok_or_else(|| malformed("response has no data.result".into()))?;

    let items = match (result_type, result) {
        (Some(kind), result) if !kind.is_series() => {
            let sample: Sample = serde_json::from_value(result)
                .map_err(|e| malformed(format!("invalid {kind} result: {e}")))?;
            vec![ResultItem::from_sample(sample)]
        }
        (_, Value::Array(series)) => series
            .into_iter()
            .map(serde_json::from_value::<ResultItem>)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| malformed(format!("invalid series: {e}")))?,
        (_, other) => {
            return Err(malformed(format!("data.result is not a list: {other}")));
        }
    };

    Ok(match request {
        Some(request) => items
            .into_iter()
            .map(|item| item.with_request(request.clone()))
            .collect(),
        None => items,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::{Map, Value, json};

    use super::extract_results;
    use crate::error::{ApiError, ErrorKind};
    use promq_model::{FormParams, Sample};

    const URL: &str = "http://prometheus:9090/api/v1/query";

    fn envelope(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn annotates_every_series_with_request() {
        let request: FormParams = [("query", "up"), ("time", "100")].into_iter().collect();
        let body = envelope(json!({
            "status": "success",
            "data": {
                "resultType": "vector",
                "result": [
                    {"metric": {"instance": "a"}, "value": [100, "1"]},
                    {"metric": {"instance": "b"}, "value": [100, "0"]}
                ]
            }
        }));

        let items = extract_results(URL, body, Some(&request)).unwrap();
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|i| i.request.as_ref() == Some(&request)));
        assert_eq!(items[1].label("instance"), Some("b"));
    }

    #[test]
    fn matrix_values_are_decoded() {
        let body = envelope(json!({
            "data": {
                "resultType": "matrix",
                "result": [
                    {"metric": {"__name__": "node_load1"}, "values": [[1, "1.5"], [2, "1.7"]]}
                ]
            }
        }));

        let items = extract_results(URL, body, None).unwrap();
        assert_eq!(items[0].values.len(), 2);
        assert_eq!(items[0].values[1].as_f64(), Some(1.7));
        assert!(items[0].request.is_none());
    }

    #[test]
    fn scalar_becomes_single_item() {
        let body = envelope(json!({
            "data": {"resultType": "scalar", "result": [1558283674.829, "1"]}
        }));

        let items = extract_results(URL, body, None).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].value, Some(Sample::new(1558283674.829, "1")));
        assert!(items[0].metric.is_empty());
    }

    #[test]
    fn missing_result_is_malformed() {
        let body = envelope(json!({"status": "success", "data": {"resultType": "vector"}}));
        let err = extract_results(URL, body, None).unwrap_err();
        assert!(matches!(err, ApiError::MalformedResponse { .. }));
        assert_eq!(err.kind(), ErrorKind::TransportFormat);
    }

    #[test]
    fn missing_data_is_malformed() {
        let err = extract_results(URL, envelope(json!({"status": "success"})), None).unwrap_err();
        assert!(err.to_string().contains("response has no data"));
    }
}

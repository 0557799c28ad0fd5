mod common;

use std::time::Duration;

use axum::http::StatusCode;
use common::{MockPrometheus, Reply, vector_for};
use promq_client::{ApiError, ClientConfig, ErrorKind, QueryClient, QuerySpec};
use serde_json::json;

fn client(mock: &MockPrometheus) -> QueryClient {
    QueryClient::new(mock.base_url.as_str(), 5).unwrap()
}

#[tokio::test]
async fn bare_string_body_is_transport_format_error() {
    let mock =
        MockPrometheus::start(|_| Reply::text(StatusCode::BAD_GATEWAY, "upstream connect error"))
            .await;

    let err = client(&mock).query("up", None).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::TransportFormat);
    assert!(matches!(err, ApiError::UnsupportedResponse { .. }));
    let msg = err.to_string();
    assert!(msg.contains(&mock.base_url), "{msg}");
    assert!(msg.contains("upstream connect error"), "{msg}");
}

#[tokio::test]
async fn bare_string_body_keeps_status() {
    let mock =
        MockPrometheus::start(|_| Reply::text(StatusCode::BAD_GATEWAY, "<html>502 Bad Gateway</html>"))
            .await;

    let err = client(&mock).query("up", Some(1)).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::TransportFormat);
    assert_eq!(err.status(), Some(502));
}

#[tokio::test]
async fn batched_non_object_body_keeps_status() {
    let mock = MockPrometheus::start(|_| {
        Reply::status(StatusCode::SERVICE_UNAVAILABLE, json!("maintenance"))
    })
    .await;

    let err = client(&mock).queries(["up"], Some(1)).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::GenericDispatch);
    assert!(matches!(err.root_cause(), ApiError::NonObjectResponse { .. }));
    assert_eq!(err.status(), Some(503));
}

#[tokio::test]
async fn message_uses_base_url_as_given() {
    let mock = MockPrometheus::start(|_| Reply::text(StatusCode::OK, "not json")).await;
    let base = mock.base_url.replacen("http://", "HTTP://", 1);
    let client = QueryClient::new(format!("{base}/"), 5).unwrap();

    let err = client.query("up", Some(1)).await.unwrap_err();

    let msg = err.to_string();
    assert!(msg.contains(&format!("{base}/api/v1/query")), "{msg}");
    assert_eq!(err.url(), Some(format!("{base}/api/v1/query").as_str()));
}

#[tokio::test]
async fn non_object_json_is_transport_format_error() {
    let mock = MockPrometheus::fixed(json!(["not", "an", "envelope"])).await;

    let err = client(&mock).rules().await.unwrap_err();

    assert!(matches!(err, ApiError::NonObjectResponse { .. }));
    assert_eq!(err.kind(), ErrorKind::TransportFormat);
}

#[tokio::test]
async fn status_500_without_envelope() {
    let mock =
        MockPrometheus::start(|_| Reply::status(StatusCode::INTERNAL_SERVER_ERROR, json!({}))).await;

    let err = client(&mock).query("up", None).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::HttpStatus);
    assert_eq!(err.status(), Some(500));
    assert!(err.to_string().contains("Internal Server Error"));
}

#[tokio::test]
async fn error_envelope_is_server_reported() {
    let mock = MockPrometheus::start(|_| {
        Reply::status(
            StatusCode::BAD_REQUEST,
            json!({
                "status": "error",
                "errorType": "bad_data",
                "error": "1:4: parse error: unexpected end of input"
            }),
        )
    })
    .await;

    let err = client(&mock).query("up{", None).await.unwrap_err();

    match &err {
        ApiError::Server {
            status,
            error_type,
            error,
            ..
        } => {
            assert_eq!(*status, 400);
            assert_eq!(error_type, "bad_data");
            assert!(error.contains("parse error"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.kind(), ErrorKind::ServerReported);
}

#[tokio::test]
async fn success_body_without_error_pair_is_not_an_error() {
    let mock = MockPrometheus::fixed(json!({
        "status": "success",
        "errorType": "",
        "data": {"resultType": "vector", "result": []}
    }))
    .await;

    let items = client(&mock).query("up", None).await.unwrap();
    assert!(items.is_empty());
}

#[tokio::test]
async fn metadata_calls_classify_errors_too() {
    let mock = MockPrometheus::start(|_| {
        Reply::status(
            StatusCode::SERVICE_UNAVAILABLE,
            json!({"status": "error", "errorType": "unavailable", "error": "tsdb not ready"}),
        )
    })
    .await;

    let err = client(&mock).labels(None, None).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ServerReported);
    assert_eq!(err.status(), Some(503));
}

#[tokio::test]
async fn missing_result_is_malformed() {
    let mock = MockPrometheus::fixed(json!({"status": "success", "data": {}})).await;

    let err = client(&mock).query("up", None).await.unwrap_err();
    assert!(matches!(err, ApiError::MalformedResponse { .. }));
    assert!(err.url().unwrap().ends_with("/api/v1/query"));
}

#[tokio::test]
async fn failing_batch_member_aborts_with_dispatch_error() {
    let mock = MockPrometheus::start(|req| {
        if req.param("query") == Some("broken(") {
            Reply::status(
                StatusCode::BAD_REQUEST,
                json!({"status": "error", "errorType": "bad_data", "error": "parse error"}),
            )
        } else {
            Reply::json(vector_for(req, &["a"]))
        }
    })
    .await;

    let err = client(&mock)
        .queries(
            vec![
                QuerySpec::new("up"),
                QuerySpec::new("broken(").with_label("dedup", "true"),
            ],
            Some(9),
        )
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::GenericDispatch);
    assert_eq!(err.root_cause().kind(), ErrorKind::ServerReported);
    let request = err.request().expect("failed request attached");
    assert_eq!(request.get("query"), Some("broken("));
    assert_eq!(request.get("time"), Some("9"));
    assert_eq!(request.get("dedup"), Some("true"));
    assert!(err.to_string().starts_with("error getting response for {"));
}

#[tokio::test]
async fn single_query_error_is_not_wrapped() {
    let mock = MockPrometheus::start(|_| Reply::text(StatusCode::OK, "<html>login</html>")).await;

    let err = client(&mock).query_range("up", None, None, None).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TransportFormat);
    assert!(err.request().is_none());
}

#[tokio::test]
async fn timeout_surfaces_as_transport_error() {
    let mock = MockPrometheus::start(|req| {
        Reply::json(vector_for(req, &["a"])).delayed(Duration::from_secs(3))
    })
    .await;
    let client = QueryClient::from_config(
        ClientConfig::new(mock.base_url.as_str()).with_timeout(Duration::from_millis(200)),
    )
    .unwrap();

    let err = client.query("up", None).await.unwrap_err();

    assert!(matches!(err, ApiError::Transport { .. }));
    assert_eq!(err.kind(), ErrorKind::TransportFormat);
    assert!(err.is_timeout());
}

#[tokio::test]
async fn connection_refused_is_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = QueryClient::new(format!("http://{addr}"), 2).unwrap();
    let err = client.alerts().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::TransportFormat);
    assert!(err.url().unwrap().contains(&addr.to_string()));
}

#[tokio::test]
async fn invalid_input_is_rejected_before_dispatch() {
    let mock = MockPrometheus::fixed(json!({})).await;
    let client = client(&mock);

    let err = client.query("   ", None).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidRequest);

    let err = client
        .query_range("up", None, None, Some(""))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidRequest);

    let err = client.queries(["up", ""], None).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidRequest);

    assert!(mock.requests().is_empty());
}

#![allow(dead_code)]

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use axum::{
    Form, Router,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri, header},
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};

/// One request as seen by the mock server.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub content_type: Option<String>,
    /// Form body for POST, decoded query string for GET.
    pub params: Vec<(String, String)>,
}

impl Recorded {
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn param_i64(&self, key: &str) -> i64 {
        self.param(key)
            .unwrap_or_else(|| panic!("missing param {key}"))
            .parse()
            .unwrap_or_else(|_| panic!("param {key} is not an integer"))
    }
}

pub struct Reply {
    pub status: StatusCode,
    pub body: String,
    pub delay: Option<Duration>,
}

impl Reply {
    pub fn json(body: Value) -> Self {
        Self::status(StatusCode::OK, body)
    }

    pub fn status(status: StatusCode, body: Value) -> Self {
        Self {
            status,
            body: body.to_string(),
            delay: None,
        }
    }

    pub fn text(status: StatusCode, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
            delay: None,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

type Responder = dyn Fn(&Recorded) -> Reply + Send + Sync;

#[derive(Clone)]
struct MockState {
    requests: Arc<Mutex<Vec<Recorded>>>,
    responder: Arc<Responder>,
}

pub struct MockPrometheus {
    pub base_url: String,
    state: MockState,
}

impl MockPrometheus {
    /// Start a server on an ephemeral port answering every request with `responder`.
    pub async fn start<F>(responder: F) -> Self
    where
        F: Fn(&Recorded) -> Reply + Send + Sync + 'static,
    {
        let state = MockState {
            requests: Arc::new(Mutex::new(Vec::new())),
            responder: Arc::new(responder),
        };
        let app = Router::new()
            .fallback(record_and_reply)
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock server");
        let addr = listener.local_addr().expect("mock server address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock server");
        });

        Self {
            base_url: format!("http://{addr}"),
            state,
        }
    }

    /// Server answering every request with the same JSON body.
    pub async fn fixed(body: Value) -> Self {
        Self::start(move |_| Reply::json(body.clone())).await
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn single_request(&self) -> Recorded {
        let requests = self.requests();
        assert_eq!(requests.len(), 1, "expected exactly one request: {requests:?}");
        requests.into_iter().next().unwrap()
    }
}

async fn record_and_reply(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Form(params): Form<Vec<(String, String)>>,
) -> Response {
    let recorded = Recorded {
        method,
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        content_type: headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        params,
    };

    let reply = (state.responder)(&recorded);
    state.requests.lock().unwrap().push(recorded);

    if let Some(delay) = reply.delay {
        tokio::time::sleep(delay).await;
    }
    (
        reply.status,
        [(header::CONTENT_TYPE, "application/json")],
        reply.body,
    )
        .into_response()
}

/// Vector response with one series per instance, labelled with the query that produced it.
pub fn vector_for(recorded: &Recorded, instances: &[&str]) -> Value {
    let query = recorded.param("query").unwrap_or_default();
    let time: f64 = recorded
        .param("time")
        .and_then(|t| t.parse().ok())
        .unwrap_or_default();
    let result: Vec<Value> = instances
        .iter()
        .map(|instance| {
            json!({
                "metric": {"__name__": query, "instance": instance},
                "value": [time, "1"]
            })
        })
        .collect();

    json!({
        "status": "success",
        "data": {"resultType": "vector", "result": result}
    })
}

/// Matrix response with a single series carrying the requested window bounds.
pub fn matrix_for(recorded: &Recorded) -> Value {
    let query = recorded.param("query").unwrap_or_default();
    let start = recorded.param_i64("start");
    let end = recorded.param_i64("end");

    json!({
        "status": "success",
        "data": {
            "resultType": "matrix",
            "result": [
                {"metric": {"__name__": query}, "values": [[start, "1"], [end, "2"]]}
            ]
        }
    })
}

pub fn success(data: Value) -> Value {
    json!({"status": "success", "data": data})
}

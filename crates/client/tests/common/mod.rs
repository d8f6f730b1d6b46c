use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

/// Requests observed by the stub server, in arrival order.
#[derive(Clone, Default)]
pub struct StubState {
    pub calls: Arc<Mutex<Vec<String>>>,
    pub created: Arc<Mutex<Vec<Value>>>,
}

impl StubState {
    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn created(&self) -> Vec<Value> {
        self.created.lock().unwrap().clone()
    }
}

/// Two records: an INFO line from a job and an ERROR line with a trace.
pub fn sample_records() -> Value {
    json!([
        {
            "timestamp": "2023-05-01T12:34:56.789Z",
            "sequence": 1,
            "level": "INFO",
            "loggerName": "org.wildfly.plugins.demo.logging.service.ScheduledLogger",
            "threadName": "EE-ManagedScheduledExecutorService-default-Thread-1",
            "message": "Log number 1 from job id log-job-1"
        },
        {
            "timestamp": "2023-05-01T12:35:01.002Z",
            "sequence": 2,
            "level": "ERROR",
            "loggerName": "org.wildfly.plugins.demo.logging.rest.DeploymentLogResource",
            "threadName": "default task-1",
            "message": "Forced error",
            "stackTrace": "java.lang.RuntimeException: This is an example cause."
        }
    ])
}

/// Build an in-process stand-in for the `rest/log` resource.
///
/// Only `log-job-1` is known to the per-job stop endpoint; any other id
/// answers 404 the way the real server does.
pub fn build_stub_app(state: StubState) -> Router {
    Router::new()
        .route("/rest/log/", get(list_logs).post(create_log))
        .route("/rest/log/stop", post(stop_all))
        .route("/rest/log/stop/{id}", post(stop_job))
        .route("/rest/log/start/{seconds}", post(start_job))
        .route("/rest/log/error", get(force_error))
        .route("/rest/log/active", get(active_jobs))
        .route("/broken/rest/log/", get(|| async { "not json" }))
        .with_state(state)
}

/// Bind the stub on an ephemeral port and return its root URL.
pub async fn spawn_stub() -> (String, StubState) {
    let state = StubState::default();
    let app = build_stub_app(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}/"), state)
}

async fn list_logs(State(state): State<StubState>) -> Json<Value> {
    state.record("GET /rest/log/");
    Json(sample_records())
}

async fn create_log(State(state): State<StubState>, Json(body): Json<Value>) -> Json<Value> {
    state.record("POST /rest/log/");
    state.created.lock().unwrap().push(body.clone());
    Json(body)
}

async fn stop_all(State(state): State<StubState>) -> Json<Value> {
    state.record("POST /rest/log/stop");
    Json(json!([
        {"id": "log-job-1", "cancelled": true},
        {"id": "log-job-2", "cancelled": false}
    ]))
}

async fn stop_job(State(state): State<StubState>, Path(id): Path<String>) -> impl IntoResponse {
    state.record(format!("POST /rest/log/stop/{id}"));
    if id == "log-job-1" {
        let mut body = serde_json::Map::new();
        body.insert(id, Value::Bool(true));
        (StatusCode::OK, Json(Value::Object(body)))
    } else {
        (
            StatusCode::NOT_FOUND,
            Json(json!({"error": format!("logger {id} not found")})),
        )
    }
}

async fn start_job(State(state): State<StubState>, Path(seconds): Path<u32>) -> Json<Value> {
    state.record(format!("POST /rest/log/start/{seconds}"));
    Json(json!({"id": "log-job-7"}))
}

async fn force_error(State(state): State<StubState>) -> impl IntoResponse {
    state.record("GET /rest/log/error");
    (StatusCode::INTERNAL_SERVER_ERROR, "Forced error")
}

async fn active_jobs(State(state): State<StubState>) -> Json<Value> {
    state.record("GET /rest/log/active");
    Json(json!([{"id": "log-job-1"}, {"id": "log-job-3"}]))
}

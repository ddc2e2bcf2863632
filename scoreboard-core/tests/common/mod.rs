//! Shared test utilities for scoreboard-core integration tests

use std::sync::{Arc, Mutex};

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use serde_json::{Value, json};
use tokio::net::TcpListener;

use scoreboard_core::Dataset;

/// How the fake remote store answers the next requests
#[derive(Debug, Clone, Default)]
#[allow(dead_code)]
pub enum Mode {
    /// Behave like the real transaction log
    #[default]
    Normal,
    /// Answer with this status but an `ok: true` body
    Status(StatusCode),
    /// Answer `{ok: false, error}`
    Refuse(String),
    /// Answer with a body that is not JSON
    Garbage,
}

#[derive(Debug, Default)]
pub struct FakeState {
    pub transactions: Vec<Value>,
    pub received: Vec<Value>,
    pub mode: Mode,
    pub numeric_ids: bool,
    next_id: u64,
}

/// Spreadsheet-backed store stand-in
#[derive(Clone, Default)]
pub struct FakeRemote {
    pub state: Arc<Mutex<FakeState>>,
}

#[allow(dead_code)]
impl FakeRemote {
    pub fn set_mode(&self, mode: Mode) {
        self.state.lock().unwrap().mode = mode;
    }

    pub fn push(&self, tx: Value) {
        self.state.lock().unwrap().transactions.push(tx);
    }

    pub fn received(&self) -> Vec<Value> {
        self.state.lock().unwrap().received.clone()
    }

    pub fn use_numeric_ids(&self) {
        self.state.lock().unwrap().numeric_ids = true;
    }
}

fn failure_response(mode: &Mode) -> Option<Response> {
    match mode {
        Mode::Normal => None,
        Mode::Status(status) => Some(
            (
                *status,
                axum::Json(json!({"ok": true, "id": "ignored", "transactions": []})),
            )
                .into_response(),
        ),
        Mode::Refuse(message) => {
            Some(axum::Json(json!({"ok": false, "error": message})).into_response())
        }
        Mode::Garbage => Some("<html>Please sign in</html>".into_response()),
    }
}

async fn submit(State(fake): State<FakeRemote>, axum::Json(body): axum::Json<Value>) -> Response {
    let mut state = fake.state.lock().unwrap();
    state.received.push(body.clone());
    if let Some(response) = failure_response(&state.mode) {
        return response;
    }

    state.next_id += 1;
    let id = if state.numeric_ids {
        json!(state.next_id)
    } else {
        json!(format!("row-{}", state.next_id))
    };

    let mut record = body;
    record["id"] = id.clone();
    state.transactions.push(record);

    axum::Json(json!({"ok": true, "id": id})).into_response()
}

async fn fetch(State(fake): State<FakeRemote>) -> Response {
    let state = fake.state.lock().unwrap();
    if let Some(response) = failure_response(&state.mode) {
        return response;
    }
    axum::Json(json!({"ok": true, "transactions": state.transactions})).into_response()
}

/// Spawns the fake store, returns its endpoint URL
pub async fn spawn_remote(fake: FakeRemote) -> String {
    let app = Router::new()
        .route("/exec", get(fetch).post(submit))
        .with_state(fake);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    format!("http://{}/exec", addr)
}

/// An endpoint nothing listens on
#[allow(dead_code)]
pub async fn dead_endpoint() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/exec", addr)
}

/// One empty group G1 with one student S1 (code ABC1), plus a second group
#[allow(dead_code)]
pub fn classroom() -> Dataset {
    Dataset::from_json(
        r#"{
            "groups": [
                {"id": "G1", "hour": "1", "name": "Otters", "color": "teal"},
                {"id": "G2", "hour": "2", "name": "Falcons", "color": "amber", "motto": "Up"}
            ],
            "students": [
                {"id": "S1", "name": "Ada", "groupId": "G1", "code": "ABC1", "level": 2},
                {"id": "S2", "name": "Grace", "groupId": "G2", "code": "QRS5", "classId": "P2"}
            ],
            "transactions": [
                {"id": "seed-1", "studentId": "S2", "groupId": "G2", "delta": 5, "reason": "Warmup", "date": "2024-09-01"}
            ],
            "pets": [
                {"id": "fox", "name": "Fox", "threshold": 25},
                {"id": "owl", "name": "Owl", "threshold": 100}
            ],
            "teacherPasscode": "owl"
        }"#,
    )
    .unwrap()
}

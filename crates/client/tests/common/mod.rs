//! In-process mock of the Beauty Generation API for integration tests.
//!
//! Status responses are scripted: each poll pops the next entry off a
//! queue, and an exhausted queue keeps reporting `processing` so
//! timeout behavior can be exercised.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, RawQuery, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

/// Prompt ID the mock assigns to every submitted job.
pub const MOCK_PROMPT_ID: &str = "prompt-test-123";

/// One scripted HTTP response: status code and raw body bytes.
#[derive(Clone)]
pub struct Scripted {
    pub code: u16,
    pub body: Vec<u8>,
}

impl Scripted {
    pub fn json(value: Value) -> Self {
        Self {
            code: 200,
            body: serde_json::to_vec(&value).unwrap(),
        }
    }

    pub fn status(status: &str) -> Self {
        Self::json(json!({ "status": status }))
    }

    pub fn protection_page() -> Self {
        Self {
            code: 503,
            body: b"<html><body>Checking your browser - cloudflare</body></html>".to_vec(),
        }
    }
}

/// Shared observable state of the mock server.
#[derive(Default)]
pub struct MockState {
    /// Forced submit response; `None` means accept with [`MOCK_PROMPT_ID`].
    pub submit_override: Mutex<Option<Scripted>>,
    /// Bodies received by the submission endpoints.
    pub submit_bodies: Mutex<Vec<Value>>,
    /// `X-API-Key` values seen on submissions.
    pub api_keys: Mutex<Vec<Option<String>>>,
    /// Scripted status responses, consumed front to back.
    pub status_script: Mutex<VecDeque<Scripted>>,
    /// Prompt IDs requested from the status endpoint.
    pub status_ids: Mutex<Vec<String>>,
    /// Response served by the image endpoint.
    pub image_response: Mutex<Scripted>,
    /// Raw query strings seen by the image endpoint.
    pub image_queries: Mutex<Vec<String>>,
}

impl MockState {
    pub fn with_status_script(script: Vec<Scripted>) -> Self {
        let state = Self::default();
        *state.status_script.lock().unwrap() = script.into();
        state
    }

    pub fn set_image_response(&self, code: u16, body: Vec<u8>) {
        *self.image_response.lock().unwrap() = Scripted { code, body };
    }
}

impl Default for Scripted {
    fn default() -> Self {
        Scripted {
            code: 200,
            body: Vec::new(),
        }
    }
}

/// Handle to a running mock server.
pub struct MockServer {
    pub state: Arc<MockState>,
    pub base_url: String,
}

/// Bind the mock to an ephemeral port and serve it in the background.
pub async fn start(state: MockState) -> MockServer {
    let state = Arc::new(state);

    let app = Router::new()
        .route("/api/generate", post(handle_submit))
        .route("/api/generate/random", post(handle_submit))
        .route("/api/generate/custom", post(handle_submit))
        .route("/api/status/{prompt_id}", get(handle_status))
        .route("/api/image/{filename}", get(handle_image))
        .route("/api/presets", get(handle_presets))
        .with_state(Arc::clone(&state));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock listener");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockServer {
        state,
        base_url: format!("http://{addr}"),
    }
}

fn scripted_response(scripted: Scripted) -> Response {
    (
        StatusCode::from_u16(scripted.code).unwrap(),
        scripted.body,
    )
        .into_response()
}

async fn handle_submit(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.submit_bodies.lock().unwrap().push(body);
    state.api_keys.lock().unwrap().push(
        headers
            .get("x-api-key")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    );

    if let Some(forced) = state.submit_override.lock().unwrap().clone() {
        return scripted_response(forced);
    }

    Json(json!({
        "success": true,
        "prompt_id": MOCK_PROMPT_ID,
        "prompt": "a beautiful portrait, studio lighting",
    }))
    .into_response()
}

async fn handle_status(
    State(state): State<Arc<MockState>>,
    Path(prompt_id): Path<String>,
) -> Response {
    state.status_ids.lock().unwrap().push(prompt_id);

    let next = state.status_script.lock().unwrap().pop_front();
    match next {
        Some(scripted) => scripted_response(scripted),
        // An exhausted script keeps the job pending.
        None => scripted_response(Scripted::status("processing")),
    }
}

async fn handle_image(
    State(state): State<Arc<MockState>>,
    Path(_filename): Path<String>,
    RawQuery(query): RawQuery,
) -> Response {
    state
        .image_queries
        .lock()
        .unwrap()
        .push(query.unwrap_or_default());

    let scripted = state.image_response.lock().unwrap().clone();
    scripted_response(scripted)
}

async fn handle_presets(State(_state): State<Arc<MockState>>) -> Response {
    Json(json!({
        "style": ["清纯", "性感", "古典", "现代"],
        "scene": ["办公室", "花园", "城市"],
    }))
    .into_response()
}

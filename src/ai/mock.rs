//! In-process stand-in for the chat completion backend, used by tests.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};

/// How the mock answers each model.
#[derive(Debug, Clone, Default)]
pub struct MockPlan {
    /// The one model that answers successfully.
    pub answer_from: Option<&'static str>,
    /// Content returned by `answer_from`.
    pub reply: String,
    /// Models that return 200 with no choices.
    pub malformed: Vec<&'static str>,
    /// Models that return 200 with a body that is not JSON.
    pub garbage: Vec<&'static str>,
    /// Models that hang well past any test timeout.
    pub slow: Vec<&'static str>,
}

/// A request the mock received.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub body: Value,
    pub authorization: Option<String>,
}

#[derive(Clone)]
struct MockState {
    plan: Arc<MockPlan>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// Running mock backend.
pub struct MockBackend {
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockBackend {
    pub async fn spawn(plan: MockPlan) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = MockState {
            plan: Arc::new(plan),
            requests: requests.clone(),
        };

        let app = Router::new()
            .route("/chat/completions", post(chat_completions))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().expect("Failed to get addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            requests,
        }
    }

    /// Models requested so far, in arrival order.
    pub fn attempted_models(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.body["model"].as_str().unwrap_or_default().to_string())
            .collect()
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

async fn chat_completions(
    State(state): State<MockState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let model = body["model"].as_str().unwrap_or_default().to_string();
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());

    state
        .requests
        .lock()
        .unwrap()
        .push(RecordedRequest {
            body,
            authorization,
        });

    let plan = &state.plan;
    let model = model.as_str();

    if plan.slow.iter().any(|m| *m == model) {
        tokio::time::sleep(Duration::from_secs(5)).await;
    }

    if plan.malformed.iter().any(|m| *m == model) {
        return (StatusCode::OK, Json(json!({ "choices": [] }))).into_response();
    }

    if plan.garbage.iter().any(|m| *m == model) {
        return (StatusCode::OK, "<html>gateway says hi</html>").into_response();
    }

    if plan.answer_from == Some(model) {
        return (
            StatusCode::OK,
            Json(json!({
                "id": "chatcmpl-test",
                "object": "chat.completion",
                "model": model,
                "choices": [{
                    "index": 0,
                    "message": { "role": "assistant", "content": plan.reply },
                    "finish_reason": "stop"
                }]
            })),
        )
            .into_response();
    }

    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(json!({ "error": { "message": format!("model {} is unavailable", model) } })),
    )
        .into_response()
}

// in-process stand-in for the completion endpoint, used by the tests

use std::sync::{Arc, Mutex};
use std::time::Duration;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::net::TcpListener;

#[derive(Debug, Clone)]
pub enum Reply {
    // n choices of "{index}: {last message}", content null when max_tokens is 0
    Echo,
    Ok(Value),
    Error { status: u16, body: Value },
    // echo after a delay
    Slow(Duration)
}

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub path: String,
    pub authorization: Option<String>,
    pub api_key: Option<String>,
    pub body: Value
}

#[derive(Clone)]
struct FakeState {
    reply: Arc<Reply>,
    calls: Arc<Mutex<Vec<RecordedCall>>>
}

pub struct FakeService {
    addr: std::net::SocketAddr,
    calls: Arc<Mutex<Vec<RecordedCall>>>
}

impl FakeService {

    pub async fn start(reply: Reply) -> Self {

        let calls = Arc::new(Mutex::new(Vec::new()));
        let state = FakeState { reply: Arc::new(reply), calls: calls.clone() };

        let app = Router::new()
            .fallback(handle)
            .with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0").await
            .expect("bind fake service");
        let addr = listener.local_addr().expect("local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("fake service");
        });

        FakeService { addr, calls }

    }

    pub fn base_url(&self) -> String {

        format!("http://{}", self.addr)

    }

    pub fn calls(&self) -> Vec<RecordedCall> {

        self.calls.lock().expect("calls lock").clone()

    }

}

async fn handle(
    State(state): State<FakeState>,
    uri: Uri,
    headers: HeaderMap,
    Json(body): Json<Value>
) -> Response {

    let header = |name: &str| headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    state.calls.lock().expect("calls lock").push(RecordedCall {
        path: uri.path_and_query().map(|p| p.to_string()).unwrap_or_default(),
        authorization: header("authorization"),
        api_key: header("api-key"),
        body: body.clone()
    });

    match state.reply.as_ref() {
        Reply::Echo => Json(echo(&body)).into_response(),
        Reply::Slow(delay) => {
            tokio::time::sleep(*delay).await;
            Json(echo(&body)).into_response()
        }
        Reply::Ok(value) => Json(value.clone()).into_response(),
        Reply::Error { status, body } => {
            let status = StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, Json(body.clone())).into_response()
        }
    }

}

fn echo(body: &Value) -> Value {

    let n = body["n"].as_u64().unwrap_or(1);
    let prompt = body["messages"]
        .as_array()
        .and_then(|m| m.last())
        .and_then(|m| m["content"].as_str())
        .unwrap_or_default();
    let silent = body["max_tokens"].as_u64() == Some(0);

    let choices: Vec<Value> = (0..n)
        .map(|i| {
            let content = if silent { Value::Null } else { json!(format!("{i}: {prompt}")) };
            json!({
                "index": i,
                "message": {"role": "assistant", "content": content},
                "finish_reason": if silent { "length" } else { "stop" }
            })
        })
        .collect();

    json!({
        "id": "chatcmpl-fake",
        "object": "chat.completion",
        "created": 1_700_000_000,
        "model": body["model"].as_str().unwrap_or("fake-deployment"),
        "system_fingerprint": "fp_fake",
        "choices": choices,
        "usage": {
            "prompt_tokens": 10,
            "completion_tokens": 5 * n,
            "total_tokens": 10 + 5 * n
        }
    })

}

// src/test_utils/mock_gateway_server.rs
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{routing::post, Json, Router};
use serde_json::Value;
use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

/// A response the mock will serve: either a 200 JSON body, or a status code
/// with a JSON error envelope.
pub type MockResponse = Result<Value, (u16, Value)>;

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// The `{model}:{method}` path segment the client hit.
    pub path: String,
    pub body: Value,
}

#[derive(Clone)]
struct MockServerState {
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockServerState {
    fn new(responses: Vec<MockResponse>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::from(responses))),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

async fn model_call_handler(
    State(state): State<MockServerState>,
    Path(model_call): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    log::debug!("Mock gateway received call to {}", model_call);
    state.requests.lock().unwrap().push(RecordedRequest {
        path: model_call,
        body,
    });

    match state.responses.lock().unwrap().pop_front() {
        Some(Ok(response)) => Ok(Json(response)),
        Some(Err((code, envelope))) => Err((
            StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            Json(envelope),
        )),
        None => {
            log::error!("Mock gateway ran out of responses!");
            Err((
                StatusCode::SERVICE_UNAVAILABLE,
                Json(Value::String("no more responses configured".to_string())),
            ))
        }
    }
}

pub struct MockGatewayServer {
    addr: SocketAddr,
    shutdown_tx: tokio::sync::oneshot::Sender<()>,
    pub recorded_requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockGatewayServer {
    pub async fn start(responses: Vec<MockResponse>) -> Self {
        let state = MockServerState::new(responses);
        let recorded_requests_clone = state.requests.clone();

        let app = Router::new()
            .route("/models/{model_call}", post(model_call_handler))
            .with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap_or_else(|e| {
            panic!("Failed to bind mock gateway to 127.0.0.1:0. Error: {}", e);
        });
        let addr = listener.local_addr().unwrap();
        log::info!("Mock gateway server listening on {}", addr);

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap_or_else(|e| {
                    log::error!("Mock gateway server error: {}", e);
                });
        });

        MockGatewayServer {
            addr,
            shutdown_tx,
            recorded_requests: recorded_requests_clone,
        }
    }

    /// Base URL to hand to the client under test.
    pub fn address(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub async fn shutdown(self) {
        if self.shutdown_tx.send(()).is_err() {
            log::warn!("Mock gateway shutdown signal already sent or receiver dropped.");
        }
    }
}

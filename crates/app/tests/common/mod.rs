//! In-process stand-ins for the remote services
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::extract::{Multipart, Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use url::Url;

pub const TRANSFER_TOPIC: &str =
    "0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef";

/// One request as seen by a fake service
#[derive(Debug, Clone)]
pub struct Recorded {
    pub path: String,
    pub authorization: Option<String>,
    pub sentry_auth: Option<String>,
    pub body: Value,
}

#[derive(Debug, Clone, Default)]
pub struct Recorder(Arc<Mutex<Vec<Recorded>>>);

impl Recorder {
    fn push(&self, path: &str, headers: &HeaderMap, body: Value) {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        self.0.lock().unwrap().push(Recorded {
            path: path.to_string(),
            authorization: header("authorization"),
            sentry_auth: header("x-sentry-auth"),
            body,
        });
    }

    pub fn all(&self) -> Vec<Recorded> {
        self.0.lock().unwrap().clone()
    }

    pub fn at(&self, path: &str) -> Vec<Recorded> {
        self.all().into_iter().filter(|r| r.path == path).collect()
    }
}

/// Bind `router` to an ephemeral local port and return its base URL
pub async fn serve(router: Router) -> Url {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    Url::parse(&format!("http://{}", addr)).unwrap()
}

/// Responses the fake services answer with
#[derive(Debug, Clone)]
pub struct Responses {
    pub file_hash: String,
    pub json_hash: String,
    pub encrypted_file: Value,
    pub encrypted_data: Value,
    pub receipt: Value,
    pub encrypt_status: StatusCode,
}

impl Default for Responses {
    fn default() -> Self {
        Self {
            file_hash: "QmFile".to_string(),
            json_hash: "QmMeta".to_string(),
            encrypted_file: json!({ "key": "k1", "encryptedFile": "QmEnc", "iv": "00ff" }),
            encrypted_data: json!({
                "success": true,
                "encryptedData": { "key": "k2", "blakQube": { "rarity": "0xbb" } }
            }),
            receipt: receipt_json(42),
            encrypt_status: StatusCode::OK,
        }
    }
}

pub fn receipt_json(token_id: u64) -> Value {
    json!({
        "transactionHash": "0xfeed",
        "status": "0x1",
        "logs": [{
            "address": "0xqube",
            "topics": [
                TRANSFER_TOPIC,
                format!("0x{:064x}", 0),
                format!("0x{:064x}", 0x1234),
                format!("0x{:064x}", token_id),
            ],
            "data": "0x"
        }]
    })
}

#[derive(Clone)]
struct AppState {
    recorder: Recorder,
    responses: Arc<Responses>,
}

/// Pinata, the encryption service and the mint relay on one router
pub fn services(recorder: Recorder, responses: Responses) -> Router {
    let state = AppState {
        recorder,
        responses: Arc::new(responses),
    };
    Router::new()
        .route("/pinning/pinFileToIPFS", post(pin_file))
        .route("/pinning/pinJSONToIPFS", post(pin_json))
        .route("/encrypt-file", post(encrypt_file))
        .route("/encrypt-data", post(encrypt_data))
        .route("/mint-qube", post(mint_qube))
        .with_state(state)
}

/// Collector accepting error report envelopes at `/api/:project/envelope/`
pub fn collector(recorder: Recorder) -> Router {
    Router::new()
        .route("/api/:project/envelope/", post(envelope))
        .with_state(recorder)
}

async fn pin_file(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Json<Value> {
    let mut parts = Vec::new();
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().map(str::to_string);
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await.unwrap();
        parts.push(json!({
            "name": name,
            "fileName": file_name,
            "contentType": content_type,
            "data": String::from_utf8_lossy(&data),
        }));
    }
    state
        .recorder
        .push("/pinning/pinFileToIPFS", &headers, Value::Array(parts));
    Json(json!({
        "IpfsHash": state.responses.file_hash,
        "PinSize": 12,
        "Timestamp": "2024-01-01T00:00:00Z"
    }))
}

async fn pin_json(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    state
        .recorder
        .push("/pinning/pinJSONToIPFS", &headers, body);
    Json(json!({ "IpfsHash": state.responses.json_hash }))
}

async fn encrypt_file(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state.recorder.push("/encrypt-file", &headers, body);
    (
        state.responses.encrypt_status,
        Json(state.responses.encrypted_file.clone()),
    )
}

async fn encrypt_data(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    state.recorder.push("/encrypt-data", &headers, body);
    Json(state.responses.encrypted_data.clone())
}

async fn mint_qube(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    state.recorder.push("/mint-qube", &headers, body);
    Json(state.responses.receipt.clone())
}

/// Records the event payload, the last line of the envelope
async fn envelope(
    State(recorder): State<Recorder>,
    Path(project): Path<String>,
    headers: HeaderMap,
    body: String,
) -> StatusCode {
    let Some(Ok(event)) = body.lines().last().map(serde_json::from_str::<Value>) else {
        return StatusCode::BAD_REQUEST;
    };
    recorder.push(&format!("/api/{}/envelope/", project), &headers, event);
    StatusCode::OK
}

use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use serde::Serialize;
use serde_json::Value;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use daylog_store::{BucketStore, History};

#[derive(Clone)]
struct AppState {
    store: Arc<BucketStore>,
}

/// `{ "error": ..., "data": ... }`; exactly one side is non-null.
#[derive(Serialize)]
struct Envelope<T> {
    error: Option<String>,
    data: Option<T>,
}

impl<T: Serialize> Envelope<T> {
    fn ok(data: T) -> axum::Json<Self> {
        axum::Json(Self { error: None, data: Some(data) })
    }

    fn err(message: impl Into<String>) -> axum::Json<Self> {
        axum::Json(Self { error: Some(message.into()), data: None })
    }
}

/// History HTTP API server.
pub async fn run(
    port: u16,
    store: Arc<BucketStore>,
    shutdown: CancellationToken,
) -> Result<(), String> {
    let listener = TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .map_err(|e| format!("bind api :{port}: {e}"))?;
    serve(listener, store, shutdown).await
}

pub(crate) async fn serve(
    listener: TcpListener,
    store: Arc<BucketStore>,
    shutdown: CancellationToken,
) -> Result<(), String> {
    let app = Router::new()
        .route("/api/history.json", get(handle_history))
        .route("/api/records", post(handle_record))
        .with_state(AppState { store });

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await
        .map_err(|e| format!("axum serve: {e}"))
}

// --- REST: GET /api/history.json ---

async fn handle_history(State(state): State<AppState>) -> impl IntoResponse {
    let data: History = state.store.all_now().await;
    Envelope::ok(data).into_response()
}

// --- REST: POST /api/records ---

async fn handle_record(
    State(state): State<AppState>,
    axum::Json(record): axum::Json<Value>,
) -> impl IntoResponse {
    let report = state.store.cleanup_now().await;
    if !report.removed.is_empty() {
        tracing::info!(removed = report.removed.len(), "swept stale partitions");
    }

    match state.store.append_now(record).await {
        Ok(record) => Envelope::ok(record).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "append failed");
            (StatusCode::INTERNAL_SERVER_ERROR, Envelope::<Value>::err(e.to_string())).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use daylog_store::{ClockZone, StoreConfig};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    async fn start(store: Arc<BucketStore>) -> (std::net::SocketAddr, CancellationToken) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let token = CancellationToken::new();
        let shutdown = token.clone();
        tokio::spawn(async move { serve(listener, store, shutdown).await.unwrap() });
        (addr, token)
    }

    /// Minimal HTTP/1.1 exchange; returns (status line, body).
    async fn exchange(addr: std::net::SocketAddr, method: &str, path: &str, body: &str) -> (String, String) {
        let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
        let request = format!(
            "{method} {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\
             Content-Type: application/json\r\nContent-Length: {}\r\n\r\n{body}",
            body.len()
        );
        stream.write_all(request.as_bytes()).await.unwrap();
        let mut raw = String::new();
        stream.read_to_string(&mut raw).await.unwrap();
        let (head, body) = raw.split_once("\r\n\r\n").unwrap();
        (head.lines().next().unwrap().to_string(), body.to_string())
    }

    fn test_store(root: &std::path::Path) -> Arc<BucketStore> {
        Arc::new(
            BucketStore::new(
                StoreConfig::new(root)
                    .with_retention_days(3)
                    .with_time_zone(ClockZone::Utc),
            )
            .unwrap(),
        )
    }

    #[tokio::test]
    async fn history_wraps_window_in_envelope() {
        let tmp = tempfile::tempdir().unwrap();
        let (addr, token) = start(test_store(tmp.path())).await;

        let (status, body) = exchange(addr, "GET", "/api/history.json", "").await;
        assert!(status.contains("200"), "{status}");
        let v: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(v["error"], Value::Null);
        let data = v["data"].as_object().unwrap();
        assert_eq!(data.len(), 3);
        assert!(data.values().all(Value::is_null));

        token.cancel();
    }

    #[tokio::test]
    async fn posted_record_shows_up_in_history() {
        let tmp = tempfile::tempdir().unwrap();
        let store = test_store(tmp.path());
        let (addr, token) = start(store.clone()).await;

        let (status, body) = exchange(addr, "POST", "/api/records", r#"{"v":1}"#).await;
        assert!(status.contains("200"), "{status}");
        let v: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(v["data"], serde_json::json!({"v": 1}));

        let (_, body) = exchange(addr, "GET", "/api/history.json", "").await;
        let v: Value = serde_json::from_str(&body).unwrap();
        let today = store.key().identifier_for(&store.now());
        assert_eq!(v["data"][today.as_str()], serde_json::json!([{"v": 1}]));

        token.cancel();
    }
}

//! Loopback HTTP server that reports back what it received.
//!
//! Every request to `/echo` or `/echo/...` is answered with a JSON [`Echo`]
//! describing its method, request target, headers and body, and is appended to
//! a shared [`Journal`]. Tests use the journal to count how many requests
//! actually reached the server.

use std::{sync::Arc, time::Duration};

use axum::{
    extract::{Path, State},
    http::{HeaderMap, Method, StatusCode, Uri},
    routing::{any, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};

/// What the server saw for one request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Echo {
    pub method: String,
    pub uri: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl Echo {
    /// Values of header `name`, in arrival order. Header names are stored
    /// lowercase.
    pub fn header_values(&self, name: &str) -> Vec<&str> {
        let name = name.to_ascii_lowercase();
        self.headers
            .iter()
            .filter(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
            .collect()
    }
}

pub type Journal = Arc<RwLock<Vec<Echo>>>;

pub fn app() -> Router {
    app_with_journal(Journal::default())
}

pub fn app_with_journal(journal: Journal) -> Router {
    Router::new()
        .route("/echo", any(echo))
        .route("/echo/{*rest}", any(echo))
        .route("/status/{code}", any(status))
        .route("/mirror", post(mirror).put(mirror))
        .route("/slow/{millis}", get(slow))
        .route("/big/{len}", get(big))
        .with_state(journal)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub async fn run_with_journal(listener: TcpListener, journal: Journal) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_journal(journal)).await
}

async fn echo(
    State(journal): State<Journal>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> Json<Echo> {
    let echo = Echo {
        method: method.to_string(),
        uri: uri.to_string(),
        headers: headers
            .iter()
            .map(|(k, v)| {
                (
                    k.as_str().to_string(),
                    String::from_utf8_lossy(v.as_bytes()).into_owned(),
                )
            })
            .collect(),
        body,
    };
    journal.write().await.push(echo.clone());
    Json(echo)
}

async fn status(Path(code): Path<u16>) -> Result<(StatusCode, String), StatusCode> {
    let status = StatusCode::from_u16(code).map_err(|_| StatusCode::BAD_REQUEST)?;
    Ok((status, status.canonical_reason().unwrap_or_default().to_string()))
}

async fn mirror(body: String) -> String {
    body
}

async fn big(Path(len): Path<usize>) -> String {
    "a".repeat(len)
}

async fn slow(Path(millis): Path<u64>) -> &'static str {
    tokio::time::sleep(Duration::from_millis(millis)).await;
    "done"
}

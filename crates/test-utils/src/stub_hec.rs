use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::IntoResponse;
use axum::Router;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// A request as seen by [`StubHecServer`].
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: String,
    pub path: String,
    /// Header names are lower-cased.
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl CapturedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        let name = name.to_ascii_lowercase();
        self.headers
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
    }
}

struct Shared {
    status: StatusCode,
    requests: Mutex<Vec<CapturedRequest>>,
}

/// HTTP server that records every request and answers each one with a fixed
/// status and a HEC-shaped JSON body.
pub struct StubHecServer {
    addr: SocketAddr,
    shared: Arc<Shared>,
    handle: JoinHandle<()>,
}

impl StubHecServer {
    pub async fn start(status: u16) -> anyhow::Result<Self> {
        let shared = Arc::new(Shared {
            status: StatusCode::from_u16(status)?,
            requests: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .fallback(capture)
            .with_state(Arc::clone(&shared));

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self {
            addr,
            shared,
            handle,
        })
    }

    pub fn host(&self) -> String {
        self.addr.ip().to_string()
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.shared.requests.lock().unwrap().clone()
    }
}

impl Drop for StubHecServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn capture(
    State(shared): State<Arc<Shared>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let headers = headers
        .iter()
        .map(|(name, value)| {
            let value = value.to_str().unwrap_or_default().to_string();
            (name.as_str().to_string(), value)
        })
        .collect();

    shared.requests.lock().unwrap().push(CapturedRequest {
        method: method.to_string(),
        path: uri.path().to_string(),
        headers,
        body: String::from_utf8_lossy(&body).into_owned(),
    });

    let payload = if shared.status.is_success() {
        r#"{"text":"Success","code":0}"#
    } else {
        r#"{"text":"Invalid token","code":4}"#
    };
    (
        shared.status,
        [(header::CONTENT_TYPE, "application/json")],
        payload,
    )
}

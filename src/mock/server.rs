use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{oneshot, Mutex};
use tokio::task::JoinHandle;

#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    /// Header names are lowercased.
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    pub fn body_as_string(&self) -> Option<String> {
        String::from_utf8(self.body.clone()).ok()
    }

    pub fn body_as_json(&self) -> Option<serde_json::Value> {
        serde_json::from_slice(&self.body).ok()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }
}

#[derive(Clone, Debug)]
pub struct MockRoute {
    method: Option<String>,
    path: String,
    responders: Vec<MockResponse>,
}

impl MockRoute {
    /// A route answering every method on `path`. Responders are handed out in
    /// order; the last one repeats once the list is exhausted.
    pub fn new(path: impl Into<String>, responders: Vec<MockResponse>) -> Self {
        Self {
            method: None,
            path: path.into(),
            responders,
        }
    }

    pub fn single(path: impl Into<String>, responder: MockResponse) -> Self {
        Self::new(path, vec![responder])
    }

    /// A route answering `path` with an empty JSON object.
    pub fn ok(path: impl Into<String>) -> Self {
        Self::single(path, MockResponse::Json(MockJsonResponse::empty()))
    }

    /// Restricts the route to a single method, e.g. `GET`.
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into().to_ascii_uppercase());
        self
    }

    fn key(&self) -> String {
        route_key(self.method.as_deref(), &self.path)
    }
}

fn route_key(method: Option<&str>, path: &str) -> String {
    match method {
        Some(method) => format!("{} {}", method, path),
        None => path.to_string(),
    }
}

#[derive(Clone, Debug)]
pub enum MockResponse {
    Json(MockJsonResponse),
}

impl MockResponse {
    pub fn json(body: serde_json::Value) -> Self {
        MockResponse::Json(MockJsonResponse::new(body))
    }

    pub fn status(status: u16) -> Self {
        MockResponse::Json(MockJsonResponse::empty().with_status(status))
    }
}

#[derive(Clone, Debug)]
pub struct MockJsonResponse {
    body: serde_json::Value,
    status: u16,
}

impl MockJsonResponse {
    pub fn new(body: serde_json::Value) -> Self {
        Self { body, status: 200 }
    }

    pub fn empty() -> Self {
        Self::new(serde_json::json!({}))
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }
}

#[derive(Clone, Debug)]
struct RouteState {
    responders: Vec<MockResponse>,
    call_count: usize,
}

impl RouteState {
    fn next(&mut self) -> Option<MockResponse> {
        if self.responders.is_empty() {
            return None;
        }

        let idx = self.call_count.min(self.responders.len() - 1);
        self.call_count += 1;
        Some(self.responders[idx].clone())
    }
}

struct MockServerState {
    routes: Mutex<HashMap<String, RouteState>>,
    recordings: Mutex<Vec<RecordedRequest>>,
}

impl MockServerState {
    async fn next_response(&self, method: &str, path: &str) -> Option<MockResponse> {
        let mut routes = self.routes.lock().await;

        let method_key = route_key(Some(method), path);
        if let Some(route) = routes.get_mut(&method_key) {
            return route.next();
        }

        routes.get_mut(path).and_then(|route| route.next())
    }

    async fn record_request(&self, record: RecordedRequest) {
        let mut recordings = self.recordings.lock().await;
        recordings.push(record);
    }

    async fn recordings(&self) -> Vec<RecordedRequest> {
        let recordings = self.recordings.lock().await;
        recordings.clone()
    }
}

pub struct MockApimockServer {
    addr: SocketAddr,
    state: Arc<MockServerState>,
    shutdown_tx: std::sync::Mutex<Option<oneshot::Sender<()>>>,
    join_handle: std::sync::Mutex<Option<JoinHandle<()>>>,
}

impl MockApimockServer {
    pub async fn start(routes: Vec<MockRoute>) -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let state = Arc::new(MockServerState {
            routes: Mutex::new(HashMap::new()),
            recordings: Mutex::new(Vec::new()),
        });

        {
            let mut map = state.routes.lock().await;
            for route in routes {
                map.insert(
                    route.key(),
                    RouteState {
                        responders: route.responders,
                        call_count: 0,
                    },
                );
            }
        }

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let state_clone = state.clone();
        let join_handle = tokio::spawn(async move {
            run_server(listener, state_clone, shutdown_rx).await;
        });

        tracing::debug!(%addr, "mock apimock server listening");

        Ok(Self {
            addr,
            state,
            shutdown_tx: std::sync::Mutex::new(Some(shutdown_tx)),
            join_handle: std::sync::Mutex::new(Some(join_handle)),
        })
    }

    pub fn address(&self) -> SocketAddr {
        self.addr
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub async fn shutdown(&self) {
        if let Some(tx) = take_slot(&self.shutdown_tx) {
            let _ = tx.send(());
        }

        if let Some(handle) = take_slot(&self.join_handle) {
            let _ = handle.await;
        }
    }

    pub async fn recorded_requests(&self) -> Vec<RecordedRequest> {
        self.state.recordings().await
    }

    pub async fn requests_for(&self, path: &str) -> Vec<RecordedRequest> {
        self.state
            .recordings()
            .await
            .into_iter()
            .filter(|record| record.path == path)
            .collect()
    }
}

impl Drop for MockApimockServer {
    fn drop(&mut self) {
        if let Some(tx) = take_slot(&self.shutdown_tx) {
            let _ = tx.send(());
        }

        if let Some(handle) = take_slot(&self.join_handle) {
            handle.abort();
        }
    }
}

fn take_slot<T>(slot: &std::sync::Mutex<Option<T>>) -> Option<T> {
    match slot.lock() {
        Ok(mut guard) => guard.take(),
        Err(poisoned) => poisoned.into_inner().take(),
    }
}

async fn run_server(
    listener: TcpListener,
    state: Arc<MockServerState>,
    mut shutdown_rx: oneshot::Receiver<()>,
) {
    loop {
        tokio::select! {
            biased;
            _ = &mut shutdown_rx => {
                break;
            }
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, _)) => {
                        let state_clone = state.clone();
                        tokio::spawn(async move {
                            if let Err(err) = handle_connection(stream, state_clone).await {
                                tracing::debug!(error = %err, "mock server connection failed");
                            }
                        });
                    }
                    Err(err) => {
                        tracing::error!(error = %err, "mock server accept error");
                        break;
                    }
                }
            }
        }
    }
}

async fn handle_connection(
    mut stream: TcpStream,
    state: Arc<MockServerState>,
) -> std::io::Result<()> {
    let mut buffer = Vec::new();
    let mut temp = [0u8; 1024];
    let mut head: Option<(usize, ParsedHead)> = None;

    loop {
        let n = stream.read(&mut temp).await?;
        if n == 0 {
            break;
        }
        buffer.extend_from_slice(&temp[..n]);

        if head.is_none() {
            if let Some(end) = find_header_end(&buffer) {
                head = Some((end, parse_request_head(&buffer[..end])));
            }
        }

        if let Some((end, parsed)) = &head {
            if buffer.len() >= end + parsed.content_length {
                break;
            }
        }
    }

    let Some((header_end, head)) = head else {
        return Ok(());
    };

    let body = if buffer.len() >= header_end + head.content_length {
        buffer[header_end..header_end + head.content_length].to_vec()
    } else {
        Vec::new()
    };

    tracing::debug!(method = %head.method, path = %head.path, "mock server received request");

    state
        .record_request(RecordedRequest {
            method: head.method.clone(),
            path: head.path.clone(),
            headers: head.headers,
            body,
        })
        .await;

    match state.next_response(&head.method, &head.path).await {
        Some(MockResponse::Json(json)) => send_json_response(json, &mut stream).await,
        None => send_not_found(&mut stream).await,
    }
}

fn find_header_end(buffer: &[u8]) -> Option<usize> {
    buffer
        .windows(4)
        .position(|window| window == b"\r\n\r\n")
        .map(|idx| idx + 4)
}

struct ParsedHead {
    method: String,
    path: String,
    headers: HashMap<String, String>,
    content_length: usize,
}

fn parse_request_head(buffer: &[u8]) -> ParsedHead {
    let head = String::from_utf8_lossy(buffer);
    let mut lines = head.split("\r\n");
    let request_line = lines.next().unwrap_or("");
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or("").to_string();
    let path = parts.next().unwrap_or("").to_string();

    let mut headers = HashMap::new();
    let mut content_length = 0usize;

    for line in lines {
        if line.trim().is_empty() {
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            let key = name.trim().to_ascii_lowercase();
            let value = value.trim().to_string();
            if key == "content-length" {
                content_length = value.parse().unwrap_or(0);
            }
            headers.insert(key, value);
        }
    }

    ParsedHead {
        method,
        path,
        headers,
        content_length,
    }
}

fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        204 => "No Content",
        400 => "Bad Request",
        404 => "Not Found",
        409 => "Conflict",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}

async fn send_not_found(stream: &mut TcpStream) -> std::io::Result<()> {
    let body = b"Not Found";
    let response = format!(
        "HTTP/1.1 404 Not Found\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        body.len()
    );
    stream.write_all(response.as_bytes()).await?;
    stream.write_all(body).await
}

async fn send_json_response(
    response: MockJsonResponse,
    stream: &mut TcpStream,
) -> std::io::Result<()> {
    let body_string = response.body.to_string();
    let header = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        response.status,
        reason_phrase(response.status),
        body_string.len()
    );
    stream.write_all(header.as_bytes()).await?;
    stream.write_all(body_string.as_bytes()).await
}

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use apimock_client::client::ApimockClient;
use apimock_client::config::ClientOptions;
use apimock_client::environment::Environment;
use apimock_client::error::ClientError;
use apimock_client::network::Transport;
use reqwest::header::HeaderMap;
use reqwest::Method;

pub const BASE_URL: &str = "http://localhost:9000";

#[derive(Clone, Debug)]
pub struct CapturedRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
}

impl CapturedRequest {
    pub fn header(&self, name: &str) -> Option<String> {
        self.headers
            .get(name)
            .map(|value| value.to_str().expect("header is ascii").to_string())
    }

    pub fn body_json(&self) -> serde_json::Value {
        let bytes = self.body.as_ref().expect("request should carry a body");
        serde_json::from_slice(bytes).expect("request body should deserialize")
    }
}

/// Transport that answers every request with a fixed status and body and
/// keeps the requests for inspection.
pub struct RecordingTransport {
    status: u16,
    body: String,
    requests: Mutex<Vec<CapturedRequest>>,
}

impl RecordingTransport {
    pub fn ok() -> Arc<Self> {
        Self::responding(200, serde_json::json!({}))
    }

    pub fn responding(status: u16, body: serde_json::Value) -> Arc<Self> {
        Arc::new(Self {
            status,
            body: body.to_string(),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> CapturedRequest {
        self.requests()
            .pop()
            .expect("at least one request should have been sent")
    }
}

#[async_trait::async_trait]
impl Transport for RecordingTransport {
    async fn fetch_response(
        &self,
        request: reqwest::Request,
    ) -> Result<reqwest::Response, ClientError> {
        self.requests.lock().unwrap().push(CapturedRequest {
            method: request.method().clone(),
            url: request.url().to_string(),
            headers: request.headers().clone(),
            body: request
                .body()
                .and_then(|body| body.as_bytes())
                .map(|bytes| bytes.to_vec()),
        });

        let response = http::Response::builder()
            .status(self.status)
            .header("content-type", "application/json")
            .body(self.body.clone())
            .unwrap();

        Ok(reqwest::Response::from(response))
    }
}

/// Environment that only remembers which hooks were called.
#[derive(Default)]
pub struct RecordingEnvironment {
    calls: Mutex<Vec<String>>,
}

impl RecordingEnvironment {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Environment for RecordingEnvironment {
    async fn open_url(&self, url: &str) -> Result<(), ClientError> {
        self.calls.lock().unwrap().push(format!("open_url {}", url));
        Ok(())
    }

    async fn set_cookie(&self, name: &str, value: &str) -> Result<(), ClientError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("set_cookie {}={}", name, value));
        Ok(())
    }
}

pub fn options() -> ClientOptions {
    ClientOptions::from_base_url(BASE_URL).expect("base url is valid")
}

pub fn recording_client(
    options: ClientOptions,
    transport: Arc<RecordingTransport>,
) -> ApimockClient<RecordingEnvironment> {
    ApimockClient::with_transport(options, RecordingEnvironment::default(), transport)
}

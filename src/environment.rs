//! Host hooks a client needs but cannot implement itself: navigating to a URL
//! and storing a cookie. A browser-automation driver implements these by
//! driving the browser; [`DirectEnvironment`] implements them in-process.

use std::collections::BTreeMap;

use tokio::sync::Mutex;

use crate::error::ClientError;

#[async_trait::async_trait]
pub trait Environment: Send + Sync {
    /// Opens the given url.
    async fn open_url(&self, url: &str) -> Result<(), ClientError>;

    /// Sets the cookie `name=value` for subsequent requests made by the host.
    async fn set_cookie(&self, name: &str, value: &str) -> Result<(), ClientError>;
}

/// Environment for callers that talk to the mock server directly rather than
/// through a browser. Cookies are kept in memory and sent along with every
/// url opened afterwards.
pub struct DirectEnvironment {
    http_client: reqwest::Client,
    cookies: Mutex<BTreeMap<String, String>>,
}

impl DirectEnvironment {
    pub fn new(http_client: reqwest::Client) -> Self {
        Self {
            http_client,
            cookies: Mutex::new(BTreeMap::new()),
        }
    }

    pub async fn cookie(&self, name: &str) -> Option<String> {
        self.cookies.lock().await.get(name).cloned()
    }

    async fn cookie_header(&self) -> Option<String> {
        let cookies = self.cookies.lock().await;
        if cookies.is_empty() {
            return None;
        }

        let pairs: Vec<String> = cookies
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect();
        Some(pairs.join("; "))
    }

    pub async fn cookies(&self) -> BTreeMap<String, String> {
        self.cookies.lock().await.clone()
    }
}

impl Default for DirectEnvironment {
    fn default() -> Self {
        Self::new(reqwest::Client::new())
    }
}

#[async_trait::async_trait]
impl Environment for DirectEnvironment {
    async fn open_url(&self, url: &str) -> Result<(), ClientError> {
        let mut request = self.http_client.get(url);
        if let Some(cookie) = self.cookie_header().await {
            request = request.header(reqwest::header::COOKIE, cookie);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            tracing::warn!(%url, status = status.as_u16(), "opening url failed");
            return Err(ClientError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        tracing::debug!(%url, "opened url");
        Ok(())
    }

    async fn set_cookie(&self, name: &str, value: &str) -> Result<(), ClientError> {
        let mut cookies = self.cookies.lock().await;
        cookies.insert(name.to_string(), value.to_string());
        Ok(())
    }
}

use std::sync::Arc;

use reqwest::header::{HeaderName, HeaderValue, CONTENT_TYPE, COOKIE};
use reqwest::Method;
use serde_json::Value;

use crate::api::Client;
use crate::config::ClientOptions;
use crate::environment::Environment;
use crate::error::ClientError;
use crate::network::{HttpTransport, Transport};
use crate::network_common::url_join;

pub struct ApimockClient<E> {
    pub options: ClientOptions,
    apimock_id: String,
    base_url: String,
    transport: Arc<dyn Transport>,
    environment: E,
}

impl<E: Environment> ApimockClient<E> {
    pub fn new(options: ClientOptions, environment: E) -> Result<Self, ClientError> {
        let transport = HttpTransport::with_options(&options)?;
        Ok(Self::with_transport(options, environment, Arc::new(transport)))
    }

    pub fn with_transport(
        options: ClientOptions,
        environment: E,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            apimock_id: uuid::Uuid::new_v4().to_string(),
            base_url: options.api_base_url(),
            options,
            transport,
            environment,
        }
    }

    pub fn environment(&self) -> &E {
        &self.environment
    }

    /// Builds the request for `query` without sending it.
    pub fn build_request(
        &self,
        query: &str,
        method: Method,
        body: &Value,
    ) -> Result<reqwest::Request, ClientError> {
        let url = url_join([self.base_url.as_str(), query]);
        let url = reqwest::Url::parse(&url)?;

        let mut request = reqwest::Request::new(method.clone(), url);
        let headers = request.headers_mut();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if self.options.use_header {
            let name = HeaderName::from_bytes(self.options.identifier.as_bytes())
                .map_err(|err| ClientError::InvalidHeader(err.to_string()))?;
            headers.insert(name, header_value(&self.apimock_id)?);
        } else {
            let cookie = format!("{}={}", self.options.identifier, self.apimock_id);
            headers.insert(COOKIE, header_value(&cookie)?);
        }

        if method != Method::GET && method != Method::HEAD {
            *request.body_mut() = Some(serde_json::to_vec(body)?.into());
        }

        Ok(request)
    }

    pub async fn fetch_response(
        &self,
        request: reqwest::Request,
    ) -> Result<reqwest::Response, ClientError> {
        self.transport.fetch_response(request).await
    }
}

fn header_value(value: &str) -> Result<HeaderValue, ClientError> {
    HeaderValue::from_str(value)
        .map_err(|err| ClientError::InvalidHeader(err.to_string()))
}

#[async_trait::async_trait]
impl<E: Environment> Client for ApimockClient<E> {
    fn apimock_id(&self) -> &str {
        &self.apimock_id
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn identifier(&self) -> &str {
        &self.options.identifier
    }

    async fn invoke(
        &self,
        query: &str,
        method: Method,
        body: &Value,
    ) -> Result<reqwest::Response, ClientError> {
        let request = self.build_request(query, method, body)?;
        let url = request.url().to_string();
        let method = request.method().clone();

        tracing::debug!(%method, %url, "invoking apimock api");
        let response = self.fetch_response(request).await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        tracing::warn!(%method, %url, status = status.as_u16(), "apimock api returned an error");
        Err(ClientError::Status {
            url,
            status: status.as_u16(),
        })
    }

    async fn open_url(&self, url: &str) -> Result<(), ClientError> {
        self.environment.open_url(url).await
    }

    async fn set_cookie(&self, name: &str, value: &str) -> Result<(), ClientError> {
        self.environment.set_cookie(name, value).await
    }
}

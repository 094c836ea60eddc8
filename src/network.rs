use crate::config::{ClientOptions, Scheme};
use crate::error::ClientError;

/// The seam every api call goes through. Swap it out to intercept requests
/// without a running mock server.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn fetch_response(&self, request: reqwest::Request) -> Result<reqwest::Response, ClientError>;
}

pub struct HttpTransport {
    pub http_client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(http_client: reqwest::Client) -> Self {
        Self { http_client }
    }

    pub fn with_options(options: &ClientOptions) -> Result<Self, ClientError> {
        Ok(Self::new(build_http_client(options)?))
    }
}

#[async_trait::async_trait]
impl Transport for HttpTransport {
    async fn fetch_response(&self, request: reqwest::Request) -> Result<reqwest::Response, ClientError> {
        Ok(self.http_client.execute(request).await?)
    }
}

pub fn build_http_client(options: &ClientOptions) -> Result<reqwest::Client, ClientError> {
    let mut builder = reqwest::Client::builder();

    if options.disable_proxy {
        builder = builder.no_proxy();
    }

    if let Some(connector) = tls_connector(options)? {
        builder = builder.use_preconfigured_tls(connector);
    }

    Ok(builder.build()?)
}

/// The connector replacing reqwest's default TLS setup, if any. Only `https`
/// base urls that accept invalid certificates get one.
pub fn tls_connector(options: &ClientOptions) -> Result<Option<native_tls::TlsConnector>, ClientError> {
    if options.scheme() != Scheme::Https || !options.accept_invalid_certs {
        return Ok(None);
    }

    let connector = native_tls::TlsConnector::builder()
        .danger_accept_invalid_certs(true)
        .danger_accept_invalid_hostnames(true)
        .build()?;

    Ok(Some(connector))
}

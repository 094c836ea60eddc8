mod network_common;

pub mod api;
pub mod client;
pub mod config;
pub mod environment;
pub mod error;
pub mod mock;
pub mod network;
pub mod types;

pub use network_common::url_join;

use std::sync::Arc;

use crate::client::ApimockClient;
use crate::config::ClientOptions;
use crate::environment::DirectEnvironment;
use crate::error::ClientError;
use crate::network::HttpTransport;

/// Create a client for the apimock server at `base_url` with default options
/// and an in-process environment.
///
/// # Errors
/// Returns an error when the base url is not a valid http(s) url.
pub fn new_client(base_url: &str) -> Result<ApimockClient<DirectEnvironment>, ClientError> {
    new_client_with_options(ClientOptions::from_base_url(base_url)?)
}

/// Create a client from explicit options. The environment and the client
/// share one HTTP client, so proxy and TLS settings apply to both.
///
/// # Errors
/// Returns an error when the HTTP client cannot be built.
pub fn new_client_with_options(
    options: ClientOptions,
) -> Result<ApimockClient<DirectEnvironment>, ClientError> {
    let http_client = network::build_http_client(&options)?;
    let environment = DirectEnvironment::new(http_client.clone());
    let transport = Arc::new(HttpTransport::new(http_client));

    Ok(ApimockClient::with_transport(options, environment, transport))
}

pub mod prelude {
    pub use crate::api::Client;
    pub use crate::client::ApimockClient;
    pub use crate::config::{ClientOptions, Configuration};
    pub use crate::environment::{DirectEnvironment, Environment};
    pub use crate::error::ClientError;
    pub use crate::network::{HttpTransport, Transport};
}

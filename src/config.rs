use serde::Deserialize;

use crate::mock::MockApimockServer;
use crate::network_common::{is_localhost, url_join};

pub const DEFAULT_BASE_PATH: &str = "/ngapimock";
pub const DEFAULT_IDENTIFIER: &str = "apimockid";

pub const BASE_URL_VAR: &str = "APIMOCK_BASE_URL";
pub const BASE_PATH_VAR: &str = "APIMOCK_BASE_PATH";
pub const IDENTIFIER_VAR: &str = "APIMOCK_IDENTIFIER";
pub const USE_HEADER_VAR: &str = "APIMOCK_USE_HEADER";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ClientOptionsError {
    #[error("invalid base url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("base url missing host")]
    MissingHost,
    #[error("unsupported url scheme: {0}")]
    UnsupportedScheme(String),
    #[error("environment variable {0} is not set")]
    MissingVariable(&'static str),
    #[error("environment variable {0} is not valid unicode")]
    NotUnicode(&'static str),
    #[error("environment variable {name} has an invalid boolean value: {value}")]
    InvalidBool { name: &'static str, value: String },
}

/// Partial configuration as supplied by a caller or a config file.
///
/// Every field left as `None` falls back to the default in [`ClientOptions`].
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    pub base_url: String,
    #[serde(default)]
    pub base_path: Option<String>,
    #[serde(default)]
    pub identifier: Option<String>,
    #[serde(default)]
    pub use_header: Option<bool>,
    #[serde(default)]
    pub disable_proxy: Option<bool>,
    #[serde(default)]
    pub accept_invalid_certs: Option<bool>,
}

#[derive(Clone, Debug)]
pub struct ClientOptions {
    pub base_url: String,
    pub base_path: String,
    /// Name of the cookie (or header) carrying the apimock id.
    pub identifier: String,
    pub use_header: bool,
    pub disable_proxy: bool,
    /// Only consulted for `https` base urls.
    pub accept_invalid_certs: bool,
    scheme: Scheme,
}

impl ClientOptions {
    pub fn from_base_url(base_url: impl AsRef<str>) -> Result<Self, ClientOptionsError> {
        let url = url::Url::parse(base_url.as_ref())?;
        let scheme = match url.scheme() {
            "http" => Scheme::Http,
            "https" => Scheme::Https,
            other => return Err(ClientOptionsError::UnsupportedScheme(other.to_string())),
        };

        let host = url.host_str().ok_or(ClientOptionsError::MissingHost)?;

        Ok(Self {
            base_url: base_url.as_ref().trim().to_string(),
            base_path: DEFAULT_BASE_PATH.to_string(),
            identifier: DEFAULT_IDENTIFIER.to_string(),
            use_header: false,
            disable_proxy: is_localhost(host),
            accept_invalid_certs: true,
            scheme,
        })
    }

    pub fn from_configuration(configuration: Configuration) -> Result<Self, ClientOptionsError> {
        let mut options = Self::from_base_url(&configuration.base_url)?;

        if let Some(base_path) = configuration.base_path {
            options.base_path = base_path;
        }
        if let Some(identifier) = configuration.identifier {
            options.identifier = identifier;
        }
        if let Some(use_header) = configuration.use_header {
            options.use_header = use_header;
        }
        if let Some(disable_proxy) = configuration.disable_proxy {
            options.disable_proxy = disable_proxy;
        }
        if let Some(accept_invalid_certs) = configuration.accept_invalid_certs {
            options.accept_invalid_certs = accept_invalid_certs;
        }

        Ok(options)
    }

    /// Reads `APIMOCK_BASE_URL` plus the optional `APIMOCK_BASE_PATH`,
    /// `APIMOCK_IDENTIFIER` and `APIMOCK_USE_HEADER` overrides.
    pub fn from_env() -> Result<Self, ClientOptionsError> {
        let base_url =
            env_var(BASE_URL_VAR)?.ok_or(ClientOptionsError::MissingVariable(BASE_URL_VAR))?;

        let use_header = match env_var(USE_HEADER_VAR)? {
            Some(value) => Some(parse_bool(USE_HEADER_VAR, &value)?),
            None => None,
        };

        Self::from_configuration(Configuration {
            base_url,
            base_path: env_var(BASE_PATH_VAR)?,
            identifier: env_var(IDENTIFIER_VAR)?,
            use_header,
            ..Default::default()
        })
    }

    pub fn for_mock_server(server: &MockApimockServer) -> Result<Self, ClientOptionsError> {
        let mut options = Self::from_base_url(server.base_url())?;
        options.disable_proxy = true;
        Ok(options)
    }

    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = base_path.into();
        self
    }

    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = identifier.into();
        self
    }

    pub fn with_use_header(mut self, use_header: bool) -> Self {
        self.use_header = use_header;
        self
    }

    pub fn with_accept_invalid_certs(mut self, accept_invalid_certs: bool) -> Self {
        self.accept_invalid_certs = accept_invalid_certs;
        self
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// The root every api query is resolved against, e.g.
    /// `http://localhost:9000/ngapimock`.
    pub fn api_base_url(&self) -> String {
        url_join([self.base_url.as_str(), self.base_path.as_str()])
    }
}

fn env_var(name: &'static str) -> Result<Option<String>, ClientOptionsError> {
    match std::env::var(name) {
        Ok(value) => Ok(Some(value)),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(std::env::VarError::NotUnicode(_)) => Err(ClientOptionsError::NotUnicode(name)),
    }
}

fn parse_bool(name: &'static str, value: &str) -> Result<bool, ClientOptionsError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ClientOptionsError::InvalidBool {
            name,
            value: value.to_string(),
        }),
    }
}

//! HTTP collaborator used by the remote backends.
//!
//! The validator only needs "send a request, get status and body back".
//! [`HttpTransport`] implements that on top of a blocking `reqwest` client;
//! tests and embedders can plug in anything implementing [`Transport`].

use std::fmt;
use thiserror::Error;

/// HTTP method of a [`RemoteRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::Post => write!(f, "POST"),
        }
    }
}

/// Request handed to a [`Transport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl RemoteRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn post(url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            method: Method::Post,
            url: url.into(),
            headers: Vec::new(),
            body: Some(body.into()),
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// First header value with the given name (case-insensitive).
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Status and body returned by a [`Transport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteResponse {
    pub status: u16,
    /// Reason phrase, if the transport knows one (`"Not Found"`).
    pub reason: Option<String>,
    pub body: String,
}

impl RemoteResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            reason: None,
            body: body.into(),
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// `"503 Service Unavailable"`, or just the code without a reason.
    pub fn status_line(&self) -> String {
        match &self.reason {
            Some(reason) => format!("{} {reason}", self.status),
            None => self.status.to_string(),
        }
    }
}

/// Failure to complete an HTTP round trip.
#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum TransportError {
    /// Could not open a connection.
    #[error("Can't connect to {url}: {message}")]
    Connect { url: String, message: String },
    /// Connect or read timeout expired.
    #[error("Request to {url} timed out")]
    Timeout { url: String },
    /// Anything else (TLS, body decoding, invalid URL).
    #[error("HTTP error: {0}")]
    Other(String),
}

/// Sends one request and waits for the full response.
///
/// Implementations apply their own connect/read timeouts.
pub trait Transport {
    fn send(&self, request: &RemoteRequest) -> Result<RemoteResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(&self, request: &RemoteRequest) -> Result<RemoteResponse, TransportError> {
        (**self).send(request)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(&self, request: &RemoteRequest) -> Result<RemoteResponse, TransportError> {
        (**self).send(request)
    }
}

#[cfg(feature = "http")]
pub use http::HttpTransport;

#[cfg(feature = "http")]
mod http {
    use super::{Method, RemoteRequest, RemoteResponse, Transport, TransportError};
    use crate::config::{ProxyConfig, ValidatorConfig};
    use crate::error::VatError;

    /// Blocking `reqwest` transport.
    #[derive(Debug, Clone)]
    pub struct HttpTransport {
        client: reqwest::blocking::Client,
    }

    impl HttpTransport {
        /// Build a client honoring the proxy and timeout settings of `config`.
        pub fn new(config: &ValidatorConfig) -> Result<Self, VatError> {
            let mut builder = reqwest::blocking::Client::builder()
                .timeout(config.timeout)
                .connect_timeout(config.timeout)
                .user_agent(concat!("vatcheck/", env!("CARGO_PKG_VERSION")));

            builder = match &config.proxy {
                ProxyConfig::Environment => builder,
                ProxyConfig::None => builder.no_proxy(),
                ProxyConfig::Explicit { protocols, url } => {
                    let mut builder = builder.no_proxy();
                    for protocol in protocols {
                        let proxy = match protocol.as_str() {
                            "http" => reqwest::Proxy::http(url),
                            "https" => reqwest::Proxy::https(url),
                            other => {
                                return Err(VatError::Config(format!(
                                    "unsupported proxy protocol '{other}'"
                                )));
                            }
                        }
                        .map_err(|e| VatError::Config(format!("invalid proxy URL: {e}")))?;
                        builder = builder.proxy(proxy);
                    }
                    builder
                }
            };

            let client = builder
                .build()
                .map_err(|e| VatError::Config(format!("HTTP client: {e}")))?;
            Ok(Self { client })
        }
    }

    impl Transport for HttpTransport {
        fn send(&self, request: &RemoteRequest) -> Result<RemoteResponse, TransportError> {
            let mut req = match request.method {
                Method::Get => self.client.get(&request.url),
                Method::Post => self.client.post(&request.url),
            };
            for (name, value) in &request.headers {
                req = req.header(name.as_str(), value.as_str());
            }
            if let Some(body) = &request.body {
                req = req.body(body.clone());
            }

            let resp = req.send().map_err(|e| classify(&request.url, e))?;
            let status = resp.status();
            let body = resp.text().map_err(|e| classify(&request.url, e))?;

            let response = RemoteResponse::new(status.as_u16(), body);
            Ok(match status.canonical_reason() {
                Some(reason) => response.with_reason(reason),
                None => response,
            })
        }
    }

    fn classify(url: &str, e: reqwest::Error) -> TransportError {
        if e.is_timeout() {
            TransportError::Timeout { url: url.into() }
        } else if e.is_connect() {
            TransportError::Connect {
                url: url.into(),
                message: e.to_string(),
            }
        } else {
            TransportError::Other(e.to_string())
        }
    }
}

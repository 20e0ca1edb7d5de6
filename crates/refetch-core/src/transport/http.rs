//! HTTP transport backed by reqwest.

use super::{RawResponse, Transport, TransportError};
use crate::target::Target;
use std::time::Duration;

/// Builder for `HttpTransport`: per-attempt timeouts and user agent.
#[derive(Debug, Clone)]
pub struct HttpTransportBuilder {
    connect_timeout: Duration,
    request_timeout: Duration,
    user_agent: Option<String>,
}

impl Default for HttpTransportBuilder {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(15),
            request_timeout: Duration::from_secs(30),
            user_agent: None,
        }
    }
}

impl HttpTransportBuilder {
    /// Timeout for establishing the connection.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Timeout for the whole request, body read included. This is the
    /// per-attempt deadline; it surfaces to the fetcher as a transient
    /// `Timeout` error.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn build(self) -> Result<HttpTransport, TransportError> {
        let mut builder = reqwest::Client::builder()
            .connect_timeout(self.connect_timeout)
            .timeout(self.request_timeout);
        if let Some(ua) = self.user_agent {
            builder = builder.user_agent(ua);
        }
        let client = builder
            .build()
            .map_err(|e| TransportError::Rejected(Box::new(e)))?;
        Ok(HttpTransport { client })
    }
}

/// reqwest-backed `Transport`. Cheap to clone; the inner client pools
/// connections and is safe for concurrent use.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Transport with default timeouts (15 s connect, 30 s request).
    pub fn new() -> Result<Self, TransportError> {
        HttpTransportBuilder::default().build()
    }

    pub fn builder() -> HttpTransportBuilder {
        HttpTransportBuilder::default()
    }
}

impl Transport for HttpTransport {
    async fn send(&self, target: &Target) -> Result<RawResponse, TransportError> {
        let response = self
            .client
            .get(target.as_str())
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(map_reqwest_error)?;
        Ok(RawResponse::new(status, body.to_vec()))
    }
}

/// Map a reqwest error into the transport taxonomy.
///
/// Builder errors (invalid URL, client misconfiguration) cannot be fixed by
/// retrying; everything else on the wire is treated as a connection-level
/// failure unless it is a timeout.
fn map_reqwest_error(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout(Box::new(e))
    } else if e.is_builder() {
        TransportError::Rejected(Box::new(e))
    } else {
        TransportError::Connection(Box::new(e))
    }
}

//! Wire access to the separation server.
//!
//! Calls are blocking. They are only ever made from worker threads (or from
//! `check_server`, which the host calls once at startup).

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder};
use sam_audio_values::{HealthResponse, SeparateRequest, SeparateResponse};
use serde::de::DeserializeOwned;

use crate::config::ClientConfig;
use crate::error::ClientError;

/// The two server calls the client makes.
pub trait Transport: Send + Sync + 'static {
    fn health(&self) -> Result<HealthResponse, ClientError>;

    fn separate(&self, request: &SeparateRequest) -> Result<SeparateResponse, ClientError>;
}

/// HTTP transport over `reqwest`'s blocking client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    health_url: String,
    separate_url: String,
    health_timeout: Duration,
    separate_timeout: Duration,
}

impl HttpTransport {
    /// Build a transport for `config.server_url`.
    ///
    /// Must not be called from inside an async runtime.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let client = Client::builder()
            .build()
            .map_err(|e| ClientError::Other(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            health_url: config.endpoint("/health"),
            separate_url: config.endpoint("/separate"),
            health_timeout: config.health_timeout,
            separate_timeout: config.separate_timeout,
        })
    }

    fn send<R: DeserializeOwned>(request: RequestBuilder) -> Result<R, ClientError> {
        let response = request.send()?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ClientError::Http {
                status: status.as_u16(),
                body,
            });
        }
        response.json::<R>().map_err(|e| ClientError::Decode(e.to_string()))
    }
}

impl Transport for HttpTransport {
    fn health(&self) -> Result<HealthResponse, ClientError> {
        Self::send(self.client.get(&self.health_url).timeout(self.health_timeout))
    }

    fn separate(&self, request: &SeparateRequest) -> Result<SeparateResponse, ClientError> {
        Self::send(
            self.client
                .post(&self.separate_url)
                .timeout(self.separate_timeout)
                .json(request),
        )
    }
}

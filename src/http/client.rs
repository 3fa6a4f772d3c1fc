//! Thin wrapper around a reqwest Client.
//!
//! The client is passed into the fetcher and download executor rather
//! than held as a global, so tests can point it at a mock server.

use log::debug;
use reqwest::{Client, Response};
use tokio_util::sync::CancellationToken;

use crate::error::{Result, UpdateError};

/// User-Agent sent on every request. GitHub rejects requests without one.
pub const USER_AGENT: &str = concat!("ghru/", env!("GHRU_VERSION"));

#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Creates a new HTTP client wrapping the given reqwest Client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a client with the crate's User-Agent.
    pub fn with_defaults() -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(UpdateError::Network)?;
        Ok(Self { client })
    }

    /// Returns a reference to the underlying reqwest Client.
    pub fn inner(&self) -> &Client {
        &self.client
    }

    /// Performs a GET request with the given per-request headers.
    /// Cancellable until the response headers arrive; transport
    /// failures map to [`UpdateError::Network`]. Status handling is
    /// the caller's concern.
    #[tracing::instrument(skip(self, headers, cancel))]
    pub async fn get(
        &self,
        url: &str,
        headers: &[(&'static str, &'static str)],
        cancel: &CancellationToken,
    ) -> Result<Response> {
        debug!("GET {}...", url);

        let mut request = self.client.get(url);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(UpdateError::Cancelled),
            response = request.send() => response.map_err(UpdateError::Network),
        }
    }
}

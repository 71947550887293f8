//! Transport seam between the request descriptors and the network.
//!
//! A `Transport` executes exactly one `HttpRequest` and hands back whatever
//! response arrived, whatever its status. Only failures that leave no response
//! at all become errors. The reqwest-backed implementation is behind the
//! `reqwest` feature, which is enabled by default.

use async_trait::async_trait;

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};

#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `request` once.
    ///
    /// # Errors
    /// `ApiError::Network` or `ApiError::Timeout` when no response was
    /// received. Non-2xx responses are returned as `Ok`.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

#[cfg(feature = "reqwest")]
pub use self::reqwest_transport::ReqwestTransport;

#[cfg(feature = "reqwest")]
mod reqwest_transport {
    use async_trait::async_trait;
    use reqwest::Method;
    use tracing::{debug, warn};

    use super::Transport;
    use crate::error::ApiError;
    use crate::http::{HttpMethod, HttpRequest, HttpResponse};

    /// Sends requests through one long-lived `reqwest::Client`, so connections
    /// are pooled across calls.
    #[derive(Debug, Clone, Default)]
    pub struct ReqwestTransport {
        client: reqwest::Client,
    }

    impl ReqwestTransport {
        pub fn new() -> Self {
            Self::default()
        }

        /// Wrap an already configured client (proxies, TLS roots, ...).
        pub fn with_client(client: reqwest::Client) -> Self {
            Self { client }
        }
    }

    #[async_trait]
    impl Transport for ReqwestTransport {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
            let url = request.url();
            let deadline = request.timeout;

            let mut builder = self.client.request(method(request.method), &url);
            for (name, value) in &request.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            if let Some(body) = request.body {
                builder = builder.body(body);
            }
            if let Some(timeout) = deadline {
                builder = builder.timeout(timeout);
            }

            let response = builder.send().await.map_err(|e| {
                warn!(method = %request.method, %url, error = %e, "request failed");
                match deadline {
                    Some(after) if e.is_timeout() => ApiError::Timeout {
                        method: request.method,
                        after,
                    },
                    _ => ApiError::Network {
                        method: request.method,
                        message: e.to_string(),
                    },
                }
            })?;

            let status = response.status().as_u16();
            let headers = response
                .headers()
                .iter()
                .filter_map(|(name, value)| {
                    value
                        .to_str()
                        .ok()
                        .map(|v| (name.as_str().to_string(), v.to_string()))
                })
                .collect();
            let body = response
                .text()
                .await
                .map_err(|e| ApiError::Network {
                    method: request.method,
                    message: e.to_string(),
                })?;
            debug!(method = %request.method, %url, status, "received response");

            Ok(HttpResponse {
                status,
                headers,
                body,
            })
        }
    }

    fn method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Delete => Method::DELETE,
        }
    }
}

//! Error types for the booking API client.
//!
//! # Design
//! `NotFound` gets a dedicated variant because callers frequently distinguish
//! "the booking or event type does not exist" from "the server returned an
//! unexpected status." All other non-2xx responses land in `HttpStatus` with
//! the raw status code and body. `Validation` is raised before anything is
//! dispatched; `Network` and `Timeout` come from the transport when no
//! response was received at all.

use std::time::Duration;

use thiserror::Error;

use crate::http::HttpMethod;

/// Errors returned by `BookingClient` and `BookingApi`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The transport failed before a response was received.
    #[error("network error on {method}: {message}")]
    Network { method: HttpMethod, message: String },

    /// The per-request deadline elapsed before a response was received.
    #[error("{method} request timed out after {}ms", .after.as_millis())]
    Timeout { method: HttpMethod, after: Duration },

    /// The server returned 404.
    #[error("resource not found")]
    NotFound { body: String },

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// A required argument was missing or malformed; nothing was sent.
    #[error("invalid request: {0}")]
    Validation(String),

    /// Client configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(String),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl ApiError {
    /// Whether the same request may safely be sent again.
    ///
    /// Only transport failures of GET requests qualify. A POST or DELETE that
    /// got no response may still have reached the backend.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ApiError::Network { method: HttpMethod::Get, .. }
                | ApiError::Timeout { method: HttpMethod::Get, .. }
        )
    }

    /// HTTP status carried by the error, if a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::NotFound { .. } => Some(404),
            ApiError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn network(method: HttpMethod) -> ApiError {
        ApiError::Network {
            method,
            message: "connection refused".into(),
        }
    }

    #[test]
    fn failed_gets_are_retryable() {
        assert!(network(HttpMethod::Get).is_retryable());
        assert!(ApiError::Timeout {
            method: HttpMethod::Get,
            after: Duration::from_secs(1)
        }
        .is_retryable());
    }

    #[test]
    fn failed_writes_are_not_retryable() {
        assert!(!network(HttpMethod::Post).is_retryable());
        assert!(!network(HttpMethod::Delete).is_retryable());
        assert!(!ApiError::Timeout {
            method: HttpMethod::Post,
            after: Duration::from_secs(1)
        }
        .is_retryable());
    }

    #[test]
    fn responses_and_validation_are_not_retryable() {
        assert!(!ApiError::NotFound { body: String::new() }.is_retryable());
        assert!(!ApiError::HttpStatus { status: 503, body: String::new() }.is_retryable());
        assert!(!ApiError::Validation("missing date".into()).is_retryable());
    }

    #[test]
    fn status_is_reported_only_for_responses() {
        assert_eq!(ApiError::NotFound { body: String::new() }.status(), Some(404));
        assert_eq!(
            ApiError::HttpStatus { status: 409, body: String::new() }.status(),
            Some(409)
        );
        assert_eq!(network(HttpMethod::Get).status(), None);
    }

    #[test]
    fn display_includes_status_and_body() {
        let err = ApiError::HttpStatus {
            status: 500,
            body: "boom".into(),
        };
        assert_eq!(err.to_string(), "HTTP 500: boom");
        assert_eq!(
            ApiError::Timeout {
                method: HttpMethod::Get,
                after: Duration::from_millis(250)
            }
            .to_string(),
            "GET request timed out after 250ms"
        );
        assert_eq!(
            network(HttpMethod::Post).to_string(),
            "network error on POST: connection refused"
        );
    }
}

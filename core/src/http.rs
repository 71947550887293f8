//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! These types describe HTTP requests and responses as plain data. The core
//! builds `HttpRequest` values and parses `HttpResponse` values; executing the
//! round-trip is the job of a `Transport` (or of the caller, who can drive the
//! `build_*`/`parse_*` pair directly).
//!
//! All fields use owned types (`String`, `Vec`) so a request can be inspected,
//! adjusted and moved into a transport without lifetime concerns.

use std::fmt;
use std::time::Duration;

use urlencoding::encode;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An HTTP request described as plain data.
///
/// Built by `BookingClient::build_*` methods. `path` is the absolute URL
/// without the query string; `query` keeps parameters in insertion order and
/// only ever contains keys that were actually supplied.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
    /// Deadline for this request. `None` leaves it to the transport.
    pub timeout: Option<Duration>,
}

impl HttpRequest {
    /// Full URL including the percent-encoded query string.
    pub fn url(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }
        let query = self
            .query
            .iter()
            .map(|(k, v)| format!("{}={}", encode(k), encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}?{query}", self.path)
    }

    /// Value of the first query parameter named `name`.
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Override the deadline for this call only.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// An HTTP response described as plain data.
///
/// Produced by a `Transport` (or by the caller) after executing an
/// `HttpRequest`, then passed to `BookingClient::parse_*` methods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(query: Vec<(&str, &str)>) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: "http://localhost:8000/slots".to_string(),
            query: query
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            headers: Vec::new(),
            body: None,
            timeout: None,
        }
    }

    #[test]
    fn url_without_query_is_the_path() {
        assert_eq!(request(vec![]).url(), "http://localhost:8000/slots");
    }

    #[test]
    fn url_keeps_parameter_order() {
        let req = request(vec![("eventTypeId", "evt_1"), ("date", "2024-06-01")]);
        assert_eq!(
            req.url(),
            "http://localhost:8000/slots?eventTypeId=evt_1&date=2024-06-01"
        );
    }

    #[test]
    fn url_encodes_values() {
        let req = request(vec![("note", "a b&c")]);
        assert_eq!(req.url(), "http://localhost:8000/slots?note=a%20b%26c");
    }

    #[test]
    fn with_timeout_overrides_deadline() {
        let req = request(vec![]).with_timeout(Duration::from_secs(3));
        assert_eq!(req.timeout, Some(Duration::from_secs(3)));
    }

    #[test]
    fn success_range() {
        let mut resp = HttpResponse {
            status: 204,
            headers: Vec::new(),
            body: String::new(),
        };
        assert!(resp.is_success());
        resp.status = 302;
        assert!(!resp.is_success());
    }
}

//! HTTP transport types and the `Transport` seam.
//!
//! # Design
//! Requests and responses are plain data. The gateway builds an
//! `HttpRequest`, hands it to a `Transport`, and gets back an `HttpResponse`
//! that it can cache and replay without touching the network again. The
//! production transport is a thin wrapper over a `ureq` agent; tests plug in
//! a stub that records requests and returns canned responses.
//!
//! All fields use owned types so responses can be cloned out of the cache.

use std::time::Duration;

use tracing::debug;

use crate::error::TransportError;

/// HTTP method for a request. The Hunter API is read-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
        }
    }
}

/// An HTTP request described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    /// Absolute URL without the query string.
    pub url: String,
    /// Query pairs in transmission order.
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
}

impl HttpRequest {
    /// Value of the first query pair named `key`.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    /// Raw body bytes, exactly as received.
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body as text for error messages; invalid UTF-8 is replaced.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Executes requests against the network.
///
/// Implementations must return 4xx/5xx responses as `Ok`; only failures that
/// prevent a response from existing are `Err`.
pub trait Transport: Send + Sync {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// `Transport` backed by a blocking `ureq` agent.
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    /// Build an agent whose every request is bounded by `timeout`.
    ///
    /// Status codes are never turned into errors so the response processor
    /// can classify them.
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = match request.method {
            HttpMethod::Get => self.agent.get(request.url.as_str()),
        };
        for (key, value) in &request.query {
            builder = builder.query(key, value);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let mut response = builder.call().map_err(classify)?;

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
        let body = response.body_mut().read_to_vec().map_err(classify)?;

        debug!(url = %request.url, status, "received response");
        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn classify(err: ureq::Error) -> TransportError {
    match err {
        ureq::Error::Timeout(timeout) => TransportError::Timeout(timeout.to_string()),
        ureq::Error::Io(io) if io.kind() == std::io::ErrorKind::TimedOut => {
            TransportError::Timeout(io.to_string())
        }
        other => TransportError::Connection(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_is_limited_to_2xx() {
        let response = |status| HttpResponse {
            status,
            headers: Vec::new(),
            body: Vec::new(),
        };
        assert!(response(200).is_success());
        assert!(response(204).is_success());
        assert!(!response(301).is_success());
        assert!(!response(401).is_success());
        assert!(!response(500).is_success());
    }

    #[test]
    fn text_replaces_invalid_utf8() {
        let response = HttpResponse {
            status: 502,
            headers: Vec::new(),
            body: b"bad \xFF gateway".to_vec(),
        };
        assert_eq!(response.text(), "bad \u{FFFD} gateway");
    }

    #[test]
    fn query_value_finds_first_match() {
        let request = HttpRequest {
            method: HttpMethod::Get,
            url: "https://api.hunter.io/v2/account".to_string(),
            query: vec![
                ("api_key".to_string(), "secret".to_string()),
                ("domain".to_string(), "example.com".to_string()),
            ],
            headers: Vec::new(),
        };
        assert_eq!(request.query_value("domain"), Some("example.com"));
        assert_eq!(request.query_value("limit"), None);
    }

    #[test]
    fn unreachable_host_is_a_connection_error() {
        let transport = UreqTransport::new(Duration::from_secs(2));
        let request = HttpRequest {
            method: HttpMethod::Get,
            url: "http://127.0.0.1:1/account".to_string(),
            query: Vec::new(),
            headers: Vec::new(),
        };
        let err = transport.execute(&request).unwrap_err();
        assert!(
            matches!(err, TransportError::Connection(_) | TransportError::Timeout(_)),
            "unexpected error: {err:?}"
        );
    }
}

//! HTTP request and response descriptors.
//!
//! # Design
//! The repository client never talks to the network directly. It produces
//! `HttpRequest` values and interprets `HttpResponse` values; the executor in
//! between owns the transport. A descriptor is plain data and cheap to clone,
//! which is what lets the executor hand a fresh, fully formed request to the
//! transport on every attempt.

use std::fmt;

/// Content type used for every request and response body.
pub const APPLICATION_JSON: &str = "application/json";

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// An HTTP request described as plain data.
///
/// Built by `RestClientRepository::build_*` methods and submitted by
/// `HttpExecutor::execute`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub uri: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// A request without a body.
    pub fn empty(method: HttpMethod, uri: impl Into<String>) -> Self {
        Self {
            method,
            uri: uri.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// A request carrying an already-serialized JSON body.
    pub fn json(method: HttpMethod, uri: impl Into<String>, body: String) -> Self {
        Self {
            method,
            uri: uri.into(),
            headers: vec![("content-type".to_string(), APPLICATION_JSON.to_string())],
            body: Some(body),
        }
    }
}

/// An HTTP response described as plain data.
///
/// The body is read in full by the executor before the response is handed
/// back, so parsing never suspends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_request_sets_content_type() {
        let req = HttpRequest::json(HttpMethod::Post, "http://localhost/api/x", "{}".into());
        assert_eq!(
            req.headers,
            vec![("content-type".to_string(), "application/json".to_string())]
        );
        assert_eq!(req.body.as_deref(), Some("{}"));
    }

    #[test]
    fn empty_request_has_no_headers() {
        let req = HttpRequest::empty(HttpMethod::Get, "http://localhost/api/x");
        assert!(req.headers.is_empty());
        assert!(req.body.is_none());
    }

    #[test]
    fn status_classes() {
        assert!(HttpResponse::new(204, "").is_success());
        assert!(!HttpResponse::new(404, "").is_success());
        assert!(HttpResponse::new(503, "").is_server_error());
        assert!(!HttpResponse::new(400, "").is_server_error());
    }

    #[test]
    fn method_display_matches_wire_name() {
        assert_eq!(HttpMethod::Delete.to_string(), "DELETE");
        assert_eq!(reqwest::Method::from(HttpMethod::Put), reqwest::Method::PUT);
    }
}

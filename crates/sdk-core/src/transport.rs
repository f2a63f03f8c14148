/// Transport port
use crate::error::ClientResult;
use async_trait::async_trait;
use std::fmt;

pub use reqwest::{Method, Url};

/// A single outgoing request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportRequest {
    pub method: Method,
    pub url: Url,
    pub body: Option<Vec<u8>>,
    pub content_type: Option<String>,
}

impl TransportRequest {
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            body: None,
            content_type: None,
        }
    }

    pub fn get(url: Url) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn post(url: Url) -> Self {
        Self::new(Method::POST, url)
    }

    pub fn delete(url: Url) -> Self {
        Self::new(Method::DELETE, url)
    }

    /// Attach a body together with its content type
    pub fn with_body(mut self, body: impl Into<Vec<u8>>, content_type: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self.content_type = Some(content_type.into());
        self
    }
}

/// Status code and raw body of a completed round trip
#[derive(Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body as text, with invalid UTF-8 replaced
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).trim().to_string()
    }
}

impl fmt::Debug for TransportResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransportResponse")
            .field("status", &self.status)
            .field("body", &self.text())
            .finish()
    }
}

/// Executes one HTTP round trip.
///
/// Implementations must fail with a transport-kind error when no response
/// was obtained, and must return every response (including 4xx/5xx) as a
/// [`TransportResponse`].
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: TransportRequest) -> ClientResult<TransportResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_body_sets_content_type() {
        let url = Url::parse("http://localhost:8090/jars/app").unwrap();
        let request = TransportRequest::post(url).with_body(vec![1u8, 2, 3], "application/java-archive");

        assert_eq!(request.method, Method::POST);
        assert_eq!(request.body.as_deref(), Some(&[1u8, 2, 3][..]));
        assert_eq!(request.content_type.as_deref(), Some("application/java-archive"));
    }

    #[test]
    fn test_response_success_range() {
        assert!(TransportResponse::new(200, "").is_success());
        assert!(TransportResponse::new(202, "").is_success());
        assert!(!TransportResponse::new(404, "").is_success());
        assert!(!TransportResponse::new(500, "").is_success());
    }

    #[test]
    fn test_response_text_is_trimmed() {
        let response = TransportResponse::new(200, "  {\"status\":\"OK\"}\n");
        assert_eq!(response.text(), "{\"status\":\"OK\"}");
    }
}

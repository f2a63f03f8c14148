/// reqwest-backed transport
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::transport::{Transport, TransportRequest, TransportResponse};
use async_trait::async_trait;
use reqwest::{header, Client as ReqwestClient};
use tracing::{debug, error};

/// Default [`Transport`] built on `reqwest`.
///
/// Idle connections are not kept between calls, so every round trip opens
/// and releases its own connection.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: ReqwestClient,
}

impl ReqwestTransport {
    /// Create a new transport from the client configuration
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = ReqwestClient::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_max_idle_per_host(0)
            .build()
            .map_err(|e| ClientError::transport("failed to build HTTP client", e))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: TransportRequest) -> ClientResult<TransportResponse> {
        debug!("Making {} request to {}", request.method, request.url);

        let mut builder = self.client.request(request.method.clone(), request.url.clone());
        if let Some(content_type) = &request.content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| {
            error!("Request to {} failed: {}", request.url, e);
            ClientError::from(e)
        })?;

        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(|e| {
            error!("Failed to read response body from {}: {}", request.url, e);
            ClientError::from(e)
        })?;

        debug!("{} {} -> {}", request.method, request.url, status);
        Ok(TransportResponse::new(status, body.to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::Url;
    use mockito::Server;

    fn transport() -> ReqwestTransport {
        ReqwestTransport::new(&ClientConfig::new("http://localhost")).unwrap()
    }

    #[tokio::test]
    async fn test_get_returns_status_and_body() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/contexts")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"["ctx-a","ctx-b"]"#)
            .create_async()
            .await;

        let url = Url::parse(&format!("{}/contexts", server.url())).unwrap();
        let response = transport().send(TransportRequest::get(url)).await.unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.text(), r#"["ctx-a","ctx-b"]"#);

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_post_sends_body_and_content_type() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/jars/wordcount")
            .match_header("content-type", "application/java-archive")
            .match_body("PK\u{3}\u{4}")
            .with_status(200)
            .with_body("OK")
            .create_async()
            .await;

        let url = Url::parse(&format!("{}/jars/wordcount", server.url())).unwrap();
        let request = TransportRequest::post(url)
            .with_body(b"PK\x03\x04".to_vec(), "application/java-archive");
        let response = transport().send(request).await.unwrap();

        assert_eq!(response.status, 200);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_error_status_is_not_a_transport_error() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("DELETE", "/contexts/missing")
            .with_status(404)
            .with_body("context missing not found")
            .create_async()
            .await;

        let url = Url::parse(&format!("{}/contexts/missing", server.url())).unwrap();
        let response = transport().send(TransportRequest::delete(url)).await.unwrap();

        assert_eq!(response.status, 404);
        assert!(!response.is_success());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        // Port 9 (discard) is closed on test hosts.
        let url = Url::parse("http://127.0.0.1:9/jobs").unwrap();
        let error = transport().send(TransportRequest::get(url)).await.unwrap_err();

        assert!(error.is_transport());
    }
}

//! HTTP client for the Herald gateway API

use crate::error::{GatewayError, Result};
use crate::types::*;
use reqwest::{header, multipart, redirect, Client, StatusCode};
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

/// HTTP client for the Herald gateway API
///
/// Cheap to clone; clones share the underlying connection pool.
///
/// # Example
///
/// ```rust,no_run
/// use herald_gateway_client::{GatewayClient, GatewayConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = GatewayClient::new(GatewayConfig::new("http://localhost:4024"))?;
///
/// let response = client.get_message("3c5b05761c8f94a7b8fe6d0d43e5fb91f9689c53c078a870e5e300c7da8a1878").await?;
/// println!("{}", response.status);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct GatewayClient {
    config: GatewayConfig,
    client: Client,
}

impl GatewayClient {
    /// Create a new gateway client
    pub fn new(config: GatewayConfig) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        if let Some(ref api_key) = config.api_key {
            let value = header::HeaderValue::from_str(&format!("Bearer {}", api_key))
                .map_err(|e| GatewayError::Config(format!("invalid API key: {}", e)))?;
            headers.insert(header::AUTHORIZATION, value);
        }

        // 3xx replies go back to the caller unfollowed
        let mut builder = Client::builder()
            .default_headers(headers)
            .redirect(redirect::Policy::none());
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;

        Ok(Self { config, client })
    }

    /// Create a client for the public gateway
    pub fn with_defaults() -> Result<Self> {
        Self::new(GatewayConfig::default())
    }

    /// Get the client configuration
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_root(), path)
    }

    // ==================== Submission API ====================

    /// Submit a signed message to the primary ingestion endpoint
    ///
    /// Any status below 400 is returned as a [`GatewayReply`] so the caller can
    /// interpret it; 4xx and 5xx become [`GatewayError::Status`].
    pub async fn post_message<M: Serialize>(&self, message: &M, sync: bool) -> Result<GatewayReply> {
        let url = self.url("/api/v0/messages");
        let body = PostMessageRequest { sync, message };

        debug!(endpoint = %url, sync, "Submitting message");
        let response = self.client.post(&url).json(&body).send().await?;
        self.handle_submission(url, response).await
    }

    /// Submit a signed message through the legacy pub/sub endpoint
    pub async fn post_legacy<M: Serialize>(&self, message: &M) -> Result<GatewayReply> {
        let url = self.url("/api/v0/ipfs/pubsub/pub");
        let body = LegacyPublishRequest {
            topic: self.config.legacy_topic.clone(),
            data: serde_json::to_string(message)?,
        };

        debug!(endpoint = %url, topic = %body.topic, "Submitting message via legacy pub/sub");
        let response = self.client.post(&url).json(&body).send().await?;
        self.handle_submission(url, response).await
    }

    // ==================== Storage API ====================

    /// Push serialized JSON content to a storage engine (`storage` or `ipfs`)
    ///
    /// The body is sent byte-for-byte so the engine hashes exactly what the
    /// caller serialized.
    pub async fn add_json(&self, engine: &str, serialized: &str) -> Result<AddJsonResponse> {
        let url = self.url(&format!("/api/v0/{}/add_json", engine));

        debug!(endpoint = %url, size = serialized.len(), "Pushing JSON content");
        let response = self
            .client
            .post(&url)
            .header(header::CONTENT_TYPE, "application/json")
            .body(serialized.to_owned())
            .send()
            .await?;

        self.handle_response(url, response).await
    }

    /// Upload a file to a storage engine without an accompanying message
    pub async fn add_file(&self, engine: &str, data: Vec<u8>, file_name: &str) -> Result<AddFileResponse> {
        let url = self.url(&format!("/api/v0/{}/add_file", engine));
        let size = data.len();

        let part = multipart::Part::bytes(data)
            .file_name(file_name.to_owned())
            .mime_str("application/octet-stream")?;
        let form = multipart::Form::new().part("file", part);

        debug!(endpoint = %url, size, "Uploading file");
        let response = self.client.post(&url).multipart(form).send().await?;
        self.handle_response(url, response).await
    }

    /// Upload a file together with the signed store message that describes it
    ///
    /// Returns the raw reply like [`post_message`](Self::post_message) so the
    /// caller can map the status.
    pub async fn add_file_with_message<M: Serialize>(
        &self,
        data: Vec<u8>,
        file_name: &str,
        message: &M,
        sync: bool,
    ) -> Result<GatewayReply> {
        let url = self.url("/api/v0/storage/add_file");
        let size = data.len();
        let metadata = serde_json::to_string(&FileUploadMetadata { message, sync })?;

        let file = multipart::Part::bytes(data)
            .file_name(file_name.to_owned())
            .mime_str("application/octet-stream")?;
        let metadata = multipart::Part::text(metadata).mime_str("application/json")?;
        let form = multipart::Form::new()
            .part("file", file)
            .part("metadata", metadata);

        debug!(endpoint = %url, size, sync, "Uploading file with message");
        let response = self.client.post(&url).multipart(form).send().await?;
        self.handle_submission(url, response).await
    }

    /// Download raw file content by hash
    pub async fn download_file(&self, file_hash: &str) -> Result<Vec<u8>> {
        let url = self.url(&format!(
            "/api/v0/storage/raw/{}",
            urlencoding::encode(file_hash)
        ));

        let response = self.client.get(&url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(GatewayError::NotFound(file_hash.to_string()));
        }
        if !response.status().is_success() {
            return Err(Self::status_error(url, response).await);
        }

        Ok(response.bytes().await?.to_vec())
    }

    // ==================== Read API ====================

    /// Get a single message and its processing status
    pub async fn get_message(&self, item_hash: &str) -> Result<MessageResponse> {
        let url = self.url(&format!(
            "/api/v0/messages/{}",
            urlencoding::encode(item_hash)
        ));

        let response = self.client.get(&url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(GatewayError::NotFound(item_hash.to_string()));
        }

        self.handle_response(url, response).await
    }

    /// List messages matching a query
    pub async fn get_messages(&self, query: &MessageQuery) -> Result<MessagesPage> {
        let mut url = self.url("/api/v0/messages.json");
        let qs = query.to_query_string();
        if !qs.is_empty() {
            url.push('?');
            url.push_str(&qs);
        }

        let response = self.client.get(&url).send().await?;
        self.handle_response(url, response).await
    }

    /// Get the aggregate document of an address, optionally restricted to some keys
    pub async fn get_aggregate(&self, address: &str, keys: &[String]) -> Result<serde_json::Value> {
        let mut url = self.url(&format!(
            "/api/v0/aggregates/{}.json",
            urlencoding::encode(address)
        ));
        if !keys.is_empty() {
            url.push_str("?keys=");
            url.push_str(&urlencoding::encode(&keys.join(",")));
        }

        let response = self.client.get(&url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(GatewayError::NotFound(format!("aggregate of {}", address)));
        }

        self.handle_response(url, response).await
    }

    // ==================== Helper Methods ====================

    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: String,
        response: reqwest::Response,
    ) -> Result<T> {
        if !response.status().is_success() {
            return Err(Self::status_error(endpoint, response).await);
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            GatewayError::InvalidResponse(format!("{} returned unexpected body: {}", endpoint, e))
        })
    }

    async fn handle_submission(&self, endpoint: String, response: reqwest::Response) -> Result<GatewayReply> {
        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            return Err(Self::status_error(endpoint, response).await);
        }

        let text = response.text().await?;
        let body = if status.is_redirection() || text.trim().is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_str(&text).map_err(|e| GatewayError::MalformedReply {
                status: status.as_u16(),
                endpoint: endpoint.clone(),
                message: format!("response body is not JSON: {}", e),
            })?
        };

        Ok(GatewayReply {
            status: status.as_u16(),
            endpoint,
            body,
        })
    }

    async fn status_error(endpoint: String, response: reqwest::Response) -> GatewayError {
        let status = response.status().as_u16();
        let message = response.text().await.unwrap_or_default();
        let detail = serde_json::from_str(&message).ok();

        GatewayError::Status {
            status,
            endpoint,
            message,
            detail,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client_for(server: &MockServer) -> GatewayClient {
        GatewayClient::new(GatewayConfig::new(server.uri())).unwrap()
    }

    #[tokio::test]
    async fn test_post_message_returns_reply() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v0/messages"))
            .and(body_json(json!({"sync": false, "message": {"item_hash": "abc"}})))
            .respond_with(ResponseTemplate::new(202).set_body_json(json!({"message_status": "pending"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let reply = client
            .post_message(&json!({"item_hash": "abc"}), false)
            .await
            .unwrap();

        assert_eq!(reply.status, 202);
        assert_eq!(reply.body["message_status"], "pending");
    }

    #[tokio::test]
    async fn test_post_message_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v0/messages"))
            .respond_with(ResponseTemplate::new(422).set_body_json(json!({"error": "bad signature"})))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client.post_message(&json!({}), true).await.unwrap_err();

        match err {
            GatewayError::Status { status, detail, endpoint, .. } => {
                assert_eq!(status, 422);
                assert_eq!(detail.unwrap()["error"], "bad signature");
                assert!(endpoint.ends_with("/api/v0/messages"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_post_message_redirect_not_followed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v0/messages"))
            .respond_with(ResponseTemplate::new(307).insert_header("Location", "/elsewhere"))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/elsewhere"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(0)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let reply = client.post_message(&json!({}), false).await.unwrap();
        assert_eq!(reply.status, 307);
    }

    #[tokio::test]
    async fn test_post_message_non_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v0/messages"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy error</html>"))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client.post_message(&json!({}), false).await.unwrap_err();
        assert!(matches!(err, GatewayError::MalformedReply { status: 200, .. }));
        assert_eq!(err.status(), Some(200));
    }

    #[tokio::test]
    async fn test_post_message_empty_body_is_null() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v0/messages"))
            .respond_with(ResponseTemplate::new(202))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let reply = client.post_message(&json!({}), false).await.unwrap();
        assert_eq!(reply.status, 202);
        assert!(reply.body.is_null());
    }

    #[tokio::test]
    async fn test_post_legacy_wraps_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v0/ipfs/pubsub/pub"))
            .and(body_json(json!({"topic": DEFAULT_LEGACY_TOPIC, "data": "{\"item_hash\":\"abc\"}"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "success"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let reply = client.post_legacy(&json!({"item_hash": "abc"})).await.unwrap();
        assert_eq!(reply.status, 200);
    }

    #[tokio::test]
    async fn test_add_json() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v0/storage/add_json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "success", "hash": "QmRemote"})))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let response = client.add_json("storage", "{\"a\":1}").await.unwrap();
        assert_eq!(response.hash, "QmRemote");
    }

    #[tokio::test]
    async fn test_get_message_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v0/messages/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client.get_message("missing").await.unwrap_err();
        assert!(matches!(err, GatewayError::NotFound(hash) if hash == "missing"));
    }

    #[tokio::test]
    async fn test_get_aggregate_with_keys() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v0/aggregates/0xabc.json"))
            .and(query_param("keys", "profile,settings"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"profile": {"name": "x"}}})))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let aggregate = client
            .get_aggregate("0xabc", &["profile".into(), "settings".into()])
            .await
            .unwrap();
        assert_eq!(aggregate["data"]["profile"]["name"], "x");
    }

    #[tokio::test]
    async fn test_download_file() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v0/storage/raw/deadbeef"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"hello".to_vec()))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let bytes = client.download_file("deadbeef").await.unwrap();
        assert_eq!(bytes, b"hello");
    }

    #[test]
    fn test_invalid_api_key_is_config_error() {
        let config = GatewayConfig::default().with_api_key("bad\nkey");
        let err = GatewayClient::new(config).unwrap_err();
        assert!(matches!(err, GatewayError::Config(_)));
    }
}

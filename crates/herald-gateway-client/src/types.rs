//! Types for the gateway client API

use serde::{Deserialize, Serialize};

/// Public gateway used when no base URL is configured
pub const DEFAULT_API_URL: &str = "https://api.herald.network";

/// Pub/sub topic understood by gateways that predate `/api/v0/messages`
pub const DEFAULT_LEGACY_TOPIC: &str = "HERALD-MAIN";

/// Client configuration
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Base URL for the gateway HTTP API
    pub base_url: String,
    /// Optional API key for authentication
    pub api_key: Option<String>,
    /// Request timeout in seconds. `None` leaves cancellation to the caller.
    pub timeout_secs: Option<u64>,
    /// Topic used by the legacy pub/sub submission endpoint
    pub legacy_topic: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            api_key: None,
            timeout_secs: None,
            legacy_topic: DEFAULT_LEGACY_TOPIC.to_string(),
        }
    }
}

impl GatewayConfig {
    /// Create a config pointing at the given gateway
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Build a config from `HERALD_*` environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: std::env::var("HERALD_API_URL").unwrap_or(defaults.base_url),
            api_key: std::env::var("HERALD_API_KEY").ok().filter(|k| !k.is_empty()),
            timeout_secs: std::env::var("HERALD_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok()),
            legacy_topic: std::env::var("HERALD_LEGACY_TOPIC").unwrap_or(defaults.legacy_topic),
        }
    }

    /// Set the API key
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set a request timeout
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Set the legacy pub/sub topic
    pub fn with_legacy_topic(mut self, topic: impl Into<String>) -> Self {
        self.legacy_topic = topic.into();
        self
    }

    /// Base URL without a trailing slash
    pub fn api_root(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

// ============================================================================
// Submission Types
// ============================================================================

/// Request body for `POST /api/v0/messages`
#[derive(Debug, Clone, Serialize)]
pub struct PostMessageRequest<'a, M: Serialize> {
    /// Wait for the gateway to process the message before answering
    pub sync: bool,
    /// Signed message
    pub message: &'a M,
}

/// Request body for `POST /api/v0/ipfs/pubsub/pub`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacyPublishRequest {
    /// Pub/sub topic
    pub topic: String,
    /// Signed message, JSON encoded
    pub data: String,
}

/// Metadata part sent alongside a file to `POST /api/v0/storage/add_file`
#[derive(Debug, Clone, Serialize)]
pub struct FileUploadMetadata<'a, M: Serialize> {
    /// Signed store message describing the file
    pub message: &'a M,
    /// Wait for the gateway to process the message before answering
    pub sync: bool,
}

/// Raw answer of a submission endpoint that did not fail
#[derive(Debug, Clone)]
pub struct GatewayReply {
    /// HTTP status code
    pub status: u16,
    /// Endpoint the request was sent to
    pub endpoint: String,
    /// Response body (JSON `null` when empty or not JSON)
    pub body: serde_json::Value,
}

/// Response from the `add_json` endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddJsonResponse {
    /// Identifier assigned by the storage engine
    pub hash: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Response from the `add_file` endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddFileResponse {
    /// Identifier assigned by the storage engine
    pub hash: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

// ============================================================================
// Read Types
// ============================================================================

/// Response from `GET /api/v0/messages/{hash}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// processed, pending, rejected or forgotten
    pub status: String,
    pub item_hash: String,
    #[serde(default)]
    pub reception_time: Option<String>,
    /// The stored message (absent for rejected or forgotten messages)
    #[serde(default)]
    pub message: Option<serde_json::Value>,
    /// Hashes of the forget messages that removed this one
    #[serde(default)]
    pub forgotten_by: Vec<String>,
    /// Rejection details
    #[serde(default)]
    pub details: Option<serde_json::Value>,
}

/// Filters for `GET /api/v0/messages.json`
#[derive(Debug, Clone, Default)]
pub struct MessageQuery {
    pub addresses: Vec<String>,
    pub channels: Vec<String>,
    pub hashes: Vec<String>,
    pub refs: Vec<String>,
    pub content_types: Vec<String>,
    pub content_keys: Vec<String>,
    /// Message types (e.g. "POST", "STORE")
    pub message_types: Vec<String>,
    pub chains: Vec<String>,
    /// Lower time bound in seconds
    pub start_date: Option<f64>,
    /// Upper time bound in seconds
    pub end_date: Option<f64>,
    pub page: Option<u32>,
    pub pagination: Option<u32>,
}

impl MessageQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_addresses(mut self, addresses: Vec<String>) -> Self {
        self.addresses = addresses;
        self
    }

    pub fn with_channels(mut self, channels: Vec<String>) -> Self {
        self.channels = channels;
        self
    }

    pub fn with_hashes(mut self, hashes: Vec<String>) -> Self {
        self.hashes = hashes;
        self
    }

    pub fn with_message_types(mut self, types: Vec<String>) -> Self {
        self.message_types = types;
        self
    }

    pub fn with_page(mut self, page: u32, pagination: u32) -> Self {
        self.page = Some(page);
        self.pagination = Some(pagination);
        self
    }

    /// Encode the filters as a query string (without the leading `?`)
    pub fn to_query_string(&self) -> String {
        let mut params = Vec::new();
        let lists = [
            ("addresses", &self.addresses),
            ("channels", &self.channels),
            ("hashes", &self.hashes),
            ("refs", &self.refs),
            ("contentTypes", &self.content_types),
            ("contentKeys", &self.content_keys),
            ("msgTypes", &self.message_types),
            ("chains", &self.chains),
        ];
        for (name, values) in lists {
            if !values.is_empty() {
                params.push(format!("{}={}", name, urlencoding::encode(&values.join(","))));
            }
        }
        if let Some(start) = self.start_date {
            params.push(format!("startDate={}", start));
        }
        if let Some(end) = self.end_date {
            params.push(format!("endDate={}", end));
        }
        if let Some(page) = self.page {
            params.push(format!("page={}", page));
        }
        if let Some(pagination) = self.pagination {
            params.push(format!("pagination={}", pagination));
        }
        params.join("&")
    }
}

/// Response from `GET /api/v0/messages.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagesPage {
    pub messages: Vec<serde_json::Value>,
    #[serde(default)]
    pub pagination_page: u32,
    #[serde(default)]
    pub pagination_total: u64,
    #[serde(default)]
    pub pagination_per_page: u32,
    #[serde(default)]
    pub pagination_item: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GatewayConfig::default();
        assert_eq!(config.base_url, DEFAULT_API_URL);
        assert!(config.api_key.is_none());
        assert!(config.timeout_secs.is_none());
        assert_eq!(config.legacy_topic, DEFAULT_LEGACY_TOPIC);
    }

    #[test]
    fn test_api_root_strips_trailing_slash() {
        let config = GatewayConfig::new("http://localhost:4024/");
        assert_eq!(config.api_root(), "http://localhost:4024");
    }

    #[test]
    fn test_query_string() {
        let query = MessageQuery::new()
            .with_addresses(vec!["0xabc".into(), "0xdef".into()])
            .with_message_types(vec!["POST".into()])
            .with_page(2, 20);

        let qs = query.to_query_string();
        assert!(qs.contains("addresses=0xabc%2C0xdef"));
        assert!(qs.contains("msgTypes=POST"));
        assert!(qs.contains("page=2"));
        assert!(qs.contains("pagination=20"));
        assert!(!qs.contains("channels"));
    }

    #[test]
    fn test_empty_query_string() {
        assert_eq!(MessageQuery::default().to_query_string(), "");
    }

    #[test]
    fn test_message_response_defaults() {
        let json = r#"{"status": "forgotten", "item_hash": "abc", "forgotten_by": ["def"]}"#;
        let response: MessageResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.status, "forgotten");
        assert!(response.message.is_none());
        assert_eq!(response.forgotten_by, vec!["def".to_string()]);
    }
}

//! Content resolution: decides where message content lives and what its
//! identifier is.
//!
//! JSON content below the category's inline threshold is embedded and
//! hashed locally. Anything else is pushed to a storage engine through the
//! gateway and identified by the hash the engine returns.

use crate::error::{Result, SdkError};
use crate::message::{BuiltMessage, HashedMessage};
use crate::types::ItemType;
use herald_gateway_client::GatewayClient;
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

/// Hex-encoded SHA-256 digest
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Canonical serialized form of a content payload
pub fn serialize_content<C: Serialize>(content: &C) -> Result<String> {
    Ok(serde_json::to_string(content)?)
}

/// Where a file payload ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReference {
    /// Engine holding the file (never inline)
    pub item_type: ItemType,
    /// Identifier of the file content
    pub item_hash: String,
    /// Whether the bytes already reached the gateway. When false they must be
    /// uploaded together with the store message.
    pub uploaded: bool,
}

/// Turn a built message into a hashed one
///
/// The size check runs once on the serialized content, before any I/O.
pub async fn resolve_content<C: Serialize>(
    built: BuiltMessage<C>,
    gateway: &GatewayClient,
) -> Result<HashedMessage<C>> {
    let serialized = serialize_content(built.content())?;
    let threshold = built.message_type().inline_threshold();
    let declared = built.item_type();

    if declared.is_inline() && serialized.len() < threshold {
        let item_hash = sha256_hex(serialized.as_bytes());
        debug!(item_hash = %item_hash, size = serialized.len(), "Content kept inline");
        return built.into_hashed(ItemType::Inline, item_hash, Some(serialized));
    }

    let engine = if declared.is_inline() {
        warn!(
            size = serialized.len(),
            threshold,
            engine = ItemType::Storage.as_str(),
            "Content too large for an inline message, switching storage engine"
        );
        ItemType::Storage
    } else {
        declared
    };

    let item_hash = push_json(gateway, engine, &serialized).await?;
    built.into_hashed(engine, item_hash, None)
}

/// Resolve a raw file payload for a store message
///
/// IPFS files are uploaded right away and identified by the returned hash.
/// Storage-engine files are hashed locally and travel with the signed
/// message later on.
pub async fn resolve_file(
    data: &[u8],
    file_name: &str,
    engine: ItemType,
    gateway: &GatewayClient,
) -> Result<FileReference> {
    let engine = if engine.is_inline() {
        warn!(
            size = data.len(),
            engine = ItemType::Storage.as_str(),
            "Files cannot be stored inline, switching storage engine"
        );
        ItemType::Storage
    } else {
        engine
    };

    match engine {
        ItemType::Ipfs => {
            let endpoint = format!("/api/v0/{}/add_file", engine);
            let response = gateway
                .add_file(engine.as_str(), data.to_vec(), file_name)
                .await
                .map_err(|e| SdkError::from_push(e, &endpoint))?;
            debug!(item_hash = %response.hash, size = data.len(), "File uploaded to ipfs");
            Ok(FileReference {
                item_type: engine,
                item_hash: response.hash,
                uploaded: true,
            })
        }
        _ => {
            let item_hash = sha256_hex(data);
            debug!(item_hash = %item_hash, size = data.len(), "File hashed locally");
            Ok(FileReference {
                item_type: ItemType::Storage,
                item_hash,
                uploaded: false,
            })
        }
    }
}

async fn push_json(gateway: &GatewayClient, engine: ItemType, serialized: &str) -> Result<String> {
    let endpoint = format!("/api/v0/{}/add_json", engine);
    let response = gateway
        .add_json(engine.as_str(), serialized)
        .await
        .map_err(|e| SdkError::from_push(e, &endpoint))?;

    if response.hash.is_empty() {
        return Err(SdkError::Broadcast {
            endpoint,
            status: None,
            message: "storage engine returned an empty hash".to_string(),
        });
    }

    debug!(item_hash = %response.hash, engine = %engine, "Content pushed to storage engine");
    Ok(response.hash)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::MockAccount;
    use crate::message::MessageBuilder;
    use crate::types::MessageType;
    use herald_gateway_client::GatewayConfig;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn built(content: serde_json::Value, engine: ItemType) -> BuiltMessage<serde_json::Value> {
        MessageBuilder::new(MessageType::Post, content)
            .channel("TEST")
            .time(1.0)
            .storage_engine(engine)
            .build(&MockAccount::default())
            .unwrap()
    }

    /// A JSON string value serializes to its length plus two quotes
    fn content_of_size(size: usize) -> serde_json::Value {
        json!("a".repeat(size - 2))
    }

    fn gateway(server: &MockServer) -> GatewayClient {
        GatewayClient::new(GatewayConfig::new(server.uri())).unwrap()
    }

    #[test]
    fn test_sha256_hex() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[tokio::test]
    async fn test_inline_hash_is_stable() {
        let server = MockServer::start().await;
        let gateway = gateway(&server);

        let a = resolve_content(built(json!({"a": 1}), ItemType::Inline), &gateway).await.unwrap();
        let b = resolve_content(built(json!({"a": 1}), ItemType::Inline), &gateway).await.unwrap();

        assert_eq!(a.item_hash(), b.item_hash());
        assert_eq!(a.item_hash().len(), 64);
        assert_eq!(a.item_content(), Some("{\"a\":1}"));
        assert_eq!(a.item_hash(), sha256_hex(b"{\"a\":1}"));
    }

    #[tokio::test]
    async fn test_below_threshold_stays_inline() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;

        let content = content_of_size(49_999);
        assert_eq!(serialize_content(&content).unwrap().len(), 49_999);

        let hashed = resolve_content(built(content, ItemType::Inline), &gateway(&server))
            .await
            .unwrap();
        assert_eq!(hashed.item_type(), ItemType::Inline);
        assert_eq!(hashed.item_content().map(str::len), Some(49_999));
    }

    #[tokio::test]
    async fn test_at_threshold_moves_to_storage() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v0/storage/add_json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "success", "hash": "remote-hash"})))
            .expect(1)
            .mount(&server)
            .await;

        let content = content_of_size(50_000);
        let hashed = resolve_content(built(content, ItemType::Inline), &gateway(&server))
            .await
            .unwrap();

        assert_eq!(hashed.item_type(), ItemType::Storage);
        assert_eq!(hashed.item_hash(), "remote-hash");
        assert!(hashed.item_content().is_none());
    }

    #[tokio::test]
    async fn test_declared_ipfs_is_pushed_regardless_of_size() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v0/ipfs/add_json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"hash": "QmSmall"})))
            .expect(1)
            .mount(&server)
            .await;

        let hashed = resolve_content(built(json!({"a": 1}), ItemType::Ipfs), &gateway(&server))
            .await
            .unwrap();

        assert_eq!(hashed.item_type(), ItemType::Ipfs);
        assert_eq!(hashed.item_hash(), "QmSmall");
    }

    #[tokio::test]
    async fn test_push_failure_is_broadcast_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v0/storage/add_json"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let err = resolve_content(built(json!({"a": 1}), ItemType::Storage), &gateway(&server))
            .await
            .unwrap_err();

        assert!(err.is_broadcast_error());
        assert_eq!(err.status(), Some(503));
    }

    #[tokio::test]
    async fn test_storage_file_hashed_locally() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;

        let file = resolve_file(b"file bytes", "file", ItemType::Storage, &gateway(&server))
            .await
            .unwrap();

        assert_eq!(file.item_type, ItemType::Storage);
        assert_eq!(file.item_hash, sha256_hex(b"file bytes"));
        assert!(!file.uploaded);
    }

    #[tokio::test]
    async fn test_inline_file_downgraded_to_storage() {
        let server = MockServer::start().await;
        let file = resolve_file(b"x", "file", ItemType::Inline, &gateway(&server))
            .await
            .unwrap();
        assert_eq!(file.item_type, ItemType::Storage);
    }

    #[tokio::test]
    async fn test_ipfs_file_uploaded() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v0/ipfs/add_file"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "success", "hash": "QmFile"})))
            .expect(1)
            .mount(&server)
            .await;

        let file = resolve_file(b"file bytes", "file", ItemType::Ipfs, &gateway(&server))
            .await
            .unwrap();

        assert_eq!(file.item_type, ItemType::Ipfs);
        assert_eq!(file.item_hash, "QmFile");
        assert!(file.uploaded);
    }
}

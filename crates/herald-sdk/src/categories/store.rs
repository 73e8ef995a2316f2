//! Store messages: register a file with the network.
//!
//! The file itself is never embedded. With the ipfs engine it is uploaded
//! first and the message carries the returned hash; with the storage engine
//! it is hashed locally and uploaded together with the signed message.

use crate::account::Account;
use crate::broadcast::{self, Publication};
use crate::error::{Result, SdkError};
use crate::pipeline::{MessagePipeline, PublishOptions};
use crate::resolver::{self, FileReference};
use crate::types::{ItemType, MessageType};
use herald_gateway_client::{GatewayClient, GatewayError};
use serde::{Deserialize, Serialize};
use tracing::warn;

const DEFAULT_FILE_NAME: &str = "file";

/// Content of a store message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreContent {
    pub address: String,
    /// Engine holding the file
    pub item_type: ItemType,
    /// Identifier of the file
    pub item_hash: String,
    pub time: f64,
    #[serde(rename = "ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

/// Arguments of [`StoreClient::send`]
///
/// Exactly one of `file` and `file_hash` must be set.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// File bytes to upload
    pub file: Option<Vec<u8>>,
    /// Hash of a file the gateway already holds
    pub file_hash: Option<String>,
    pub file_name: String,
    /// Engine for the file (storage or ipfs)
    pub file_engine: ItemType,
    pub reference: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub options: PublishOptions,
}

impl StoreConfig {
    /// Store new file content
    pub fn from_bytes(file: Vec<u8>, options: PublishOptions) -> Self {
        Self {
            file: Some(file),
            file_hash: None,
            file_name: DEFAULT_FILE_NAME.to_string(),
            file_engine: ItemType::Storage,
            reference: None,
            metadata: None,
            options,
        }
    }

    /// Register a file that is already stored under `file_hash`
    pub fn from_hash(file_hash: impl Into<String>, options: PublishOptions) -> Self {
        Self {
            file: None,
            file_hash: Some(file_hash.into()),
            file_name: DEFAULT_FILE_NAME.to_string(),
            file_engine: ItemType::Storage,
            reference: None,
            metadata: None,
            options,
        }
    }

    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = name.into();
        self
    }

    pub fn with_file_engine(mut self, engine: ItemType) -> Self {
        self.file_engine = engine;
        self
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// Publishes store messages and downloads stored files
#[derive(Debug, Clone)]
pub struct StoreClient {
    pipeline: MessagePipeline,
}

impl StoreClient {
    pub fn new(gateway: GatewayClient) -> Self {
        Self::from_pipeline(MessagePipeline::new(gateway))
    }

    pub(crate) fn from_pipeline(pipeline: MessagePipeline) -> Self {
        Self { pipeline }
    }

    /// Client bound to the public gateway
    pub fn with_default_gateway() -> Result<Self> {
        Ok(Self::new(GatewayClient::with_defaults()?))
    }

    pub async fn send(&self, account: &dyn Account, config: StoreConfig) -> Result<Publication<StoreContent>> {
        // Checked before any upload
        config.options.validate()?;
        let gateway = self.pipeline.gateway();

        let (file, pending_upload) = match (config.file, config.file_hash) {
            (Some(_), Some(_)) => {
                return Err(SdkError::validation("set either a file or a file hash, not both"));
            }
            (None, None) => return Err(SdkError::validation("a file or a file hash is required")),
            (None, Some(hash)) => {
                if hash.trim().is_empty() {
                    return Err(SdkError::validation("file hash must not be empty"));
                }
                let item_type = match config.file_engine {
                    ItemType::Inline => {
                        warn!(
                            engine = ItemType::Storage.as_str(),
                            "Files cannot be stored inline, switching storage engine"
                        );
                        ItemType::Storage
                    }
                    engine => engine,
                };
                let file = FileReference {
                    item_type,
                    item_hash: hash,
                    uploaded: true,
                };
                (file, None)
            }
            (Some(data), None) => {
                let file = resolver::resolve_file(&data, &config.file_name, config.file_engine, gateway).await?;
                let pending = if file.uploaded { None } else { Some(data) };
                (file, pending)
            }
        };

        let time = config.options.resolve_time();
        let content = StoreContent {
            address: account.address().to_string(),
            item_type: file.item_type,
            item_hash: file.item_hash,
            time,
            reference: config.reference,
            metadata: config.metadata,
        };

        let builder = config.options.builder(MessageType::Store, content, time);
        let hashed = self.pipeline.prepare(builder, account).await?;

        match pending_upload {
            Some(data) => {
                broadcast::broadcast_with_file(hashed, account, gateway, data, &config.file_name, config.options.sync)
                    .await
            }
            None => broadcast::broadcast(hashed, account, gateway, config.options.sync).await,
        }
    }

    /// Download the raw content of a stored file
    pub async fn download(&self, file_hash: &str) -> Result<Vec<u8>> {
        match self.pipeline.gateway().download_file(file_hash).await {
            Ok(bytes) => Ok(bytes),
            Err(GatewayError::NotFound(_)) => Err(SdkError::MessageNotFound(file_hash.to_string())),
            Err(e) => Err(SdkError::Query(e.to_string())),
        }
    }
}

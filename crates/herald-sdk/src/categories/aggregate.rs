//! Aggregate messages: keyed documents merged per address by the network.

use crate::account::Account;
use crate::broadcast::Publication;
use crate::error::{Result, SdkError};
use crate::pipeline::{MessagePipeline, PublishOptions};
use crate::types::MessageType;
use herald_gateway_client::{GatewayClient, GatewayError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Content of an aggregate message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateContent<T> {
    pub address: String,
    pub key: String,
    pub content: T,
    pub time: f64,
}

/// Arguments of [`AggregateClient::send`]
#[derive(Debug, Clone)]
pub struct AggregateConfig<T> {
    pub key: String,
    pub content: T,
    /// Update the aggregate of another address (defaults to the signer's)
    pub address: Option<String>,
    pub options: PublishOptions,
}

impl<T> AggregateConfig<T> {
    pub fn new(key: impl Into<String>, content: T, options: PublishOptions) -> Self {
        Self {
            key: key.into(),
            content,
            address: None,
            options,
        }
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }
}

/// Publishes and reads aggregates
#[derive(Debug, Clone)]
pub struct AggregateClient {
    pipeline: MessagePipeline,
}

impl AggregateClient {
    pub fn new(gateway: GatewayClient) -> Self {
        Self {
            pipeline: MessagePipeline::new(gateway),
        }
    }

    /// Client bound to the public gateway
    pub fn with_default_gateway() -> Result<Self> {
        Ok(Self::new(GatewayClient::with_defaults()?))
    }

    pub async fn send<T: Serialize>(
        &self,
        account: &dyn Account,
        config: AggregateConfig<T>,
    ) -> Result<Publication<AggregateContent<T>>> {
        if config.key.trim().is_empty() {
            return Err(SdkError::validation("aggregate key must not be empty"));
        }

        let time = config.options.resolve_time();
        let content = AggregateContent {
            address: config.address.unwrap_or_else(|| account.address().to_string()),
            key: config.key,
            content: config.content,
            time,
        };

        let builder = config.options.builder(MessageType::Aggregate, content, time);
        self.pipeline.publish(builder, account, config.options.sync).await
    }

    /// Fetch the merged aggregate of an address
    ///
    /// Returns the `data` object keyed by aggregate key. An empty `keys`
    /// slice fetches every key.
    pub async fn fetch<T: DeserializeOwned>(&self, address: &str, keys: &[String]) -> Result<T> {
        let response = match self.pipeline.gateway().get_aggregate(address, keys).await {
            Ok(response) => response,
            Err(GatewayError::NotFound(_)) => {
                return Err(SdkError::MessageNotFound(format!("aggregate of {}", address)));
            }
            Err(e) => return Err(SdkError::Query(e.to_string())),
        };

        let data = response
            .get("data")
            .cloned()
            .ok_or_else(|| SdkError::Query(format!("aggregate of {} has no data", address)))?;
        Ok(serde_json::from_value(data)?)
    }
}

//! Forget messages: ask the network to drop earlier messages or aggregates.

use crate::account::Account;
use crate::broadcast::Publication;
use crate::error::{Result, SdkError};
use crate::pipeline::{MessagePipeline, PublishOptions};
use crate::types::MessageType;
use herald_gateway_client::GatewayClient;
use serde::{Deserialize, Serialize};

/// Content of a forget message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForgetContent {
    pub address: String,
    pub time: f64,
    /// Item hashes of the messages to forget
    pub hashes: Vec<String>,
    /// Aggregate keys to forget
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aggregates: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Arguments of [`ForgetClient::send`]
#[derive(Debug, Clone)]
pub struct ForgetConfig {
    pub hashes: Vec<String>,
    pub aggregates: Vec<String>,
    pub reason: Option<String>,
    pub options: PublishOptions,
}

impl ForgetConfig {
    pub fn new(hashes: Vec<String>, options: PublishOptions) -> Self {
        Self {
            hashes,
            aggregates: Vec::new(),
            reason: None,
            options,
        }
    }

    pub fn with_aggregates(mut self, aggregates: Vec<String>) -> Self {
        self.aggregates = aggregates;
        self
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

/// Publishes forget messages
#[derive(Debug, Clone)]
pub struct ForgetClient {
    pipeline: MessagePipeline,
}

impl ForgetClient {
    pub fn new(gateway: GatewayClient) -> Self {
        Self {
            pipeline: MessagePipeline::new(gateway),
        }
    }

    /// Client bound to the public gateway
    pub fn with_default_gateway() -> Result<Self> {
        Ok(Self::new(GatewayClient::with_defaults()?))
    }

    pub async fn send(&self, account: &dyn Account, config: ForgetConfig) -> Result<Publication<ForgetContent>> {
        if config.hashes.is_empty() && config.aggregates.is_empty() {
            return Err(SdkError::validation("nothing to forget"));
        }
        if config.hashes.iter().any(|h| h.trim().is_empty()) {
            return Err(SdkError::validation("forget hashes must not be empty"));
        }

        let time = config.options.resolve_time();
        let content = ForgetContent {
            address: account.address().to_string(),
            time,
            hashes: config.hashes,
            aggregates: config.aggregates,
            reason: config.reason,
        };

        let builder = config.options.builder(MessageType::Forget, content, time);
        self.pipeline.publish(builder, account, config.options.sync).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::MockAccount;

    #[tokio::test]
    async fn test_empty_forget_rejected_before_network() {
        // Unroutable gateway: any request would fail with an HTTP error
        let gateway = GatewayClient::new(herald_gateway_client::GatewayConfig::new("http://127.0.0.1:9")).unwrap();
        let client = ForgetClient::new(gateway);
        let account = MockAccount::default();

        let err = client
            .send(&account, ForgetConfig::new(vec![], PublishOptions::new("TEST")))
            .await
            .unwrap_err();

        assert!(matches!(err, SdkError::Validation(_)));
        assert_eq!(account.call_count(), 0);
    }

    #[test]
    fn test_forget_content_omits_empty_fields() {
        let content = ForgetContent {
            address: "0xabc".into(),
            time: 1.0,
            hashes: vec!["h1".into()],
            aggregates: vec![],
            reason: None,
        };
        let value = serde_json::to_value(&content).unwrap();
        assert!(value.get("aggregates").is_none());
        assert!(value.get("reason").is_none());
    }
}

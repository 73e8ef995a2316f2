//! Post messages: free-form application content, optionally amending an
//! earlier post.

use crate::account::Account;
use crate::broadcast::Publication;
use crate::error::{Result, SdkError};
use crate::pipeline::{MessagePipeline, PublishOptions};
use crate::types::MessageType;
use herald_gateway_client::GatewayClient;
use serde::{Deserialize, Serialize};

/// Post type that replaces the content of the referenced post
pub const AMEND_POST_TYPE: &str = "amend";

/// Content of a post message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostContent<T> {
    /// Application-defined post type
    #[serde(rename = "type")]
    pub post_type: String,
    /// Address the post is published for
    pub address: String,
    pub content: T,
    pub time: f64,
    /// Hash of the post this one refers to (required for amendments)
    #[serde(rename = "ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

/// Arguments of [`PostClient::send`]
#[derive(Debug, Clone)]
pub struct PostConfig<T> {
    pub post_type: String,
    pub content: T,
    pub reference: Option<String>,
    /// Publish on behalf of another address (defaults to the signer's)
    pub address: Option<String>,
    pub options: PublishOptions,
}

impl<T> PostConfig<T> {
    pub fn new(post_type: impl Into<String>, content: T, options: PublishOptions) -> Self {
        Self {
            post_type: post_type.into(),
            content,
            reference: None,
            address: None,
            options,
        }
    }

    /// Amend the post with the given hash
    pub fn amend(original: impl Into<String>, content: T, options: PublishOptions) -> Self {
        Self {
            post_type: AMEND_POST_TYPE.to_string(),
            content,
            reference: Some(original.into()),
            address: None,
            options,
        }
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }
}

/// Publishes post messages
#[derive(Debug, Clone)]
pub struct PostClient {
    pipeline: MessagePipeline,
}

impl PostClient {
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
        config: PostConfig<T>,
    ) -> Result<Publication<PostContent<T>>> {
        if config.post_type.trim().is_empty() {
            return Err(SdkError::validation("post type must not be empty"));
        }
        if config.post_type == AMEND_POST_TYPE && config.reference.is_none() {
            return Err(SdkError::validation("an amend post needs a reference"));
        }

        let time = config.options.resolve_time();
        let content = PostContent {
            post_type: config.post_type,
            address: config.address.unwrap_or_else(|| account.address().to_string()),
            content: config.content,
            time,
            reference: config.reference,
        };

        let builder = config.options.builder(MessageType::Post, content, time);
        self.pipeline.publish(builder, account, config.options.sync).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_post_content_wire_names() {
        let content = PostContent {
            post_type: "chat".into(),
            address: "0xabc".into(),
            content: json!({"body": "hi"}),
            time: 1.5,
            reference: Some("0xold".into()),
        };

        let value = serde_json::to_value(&content).unwrap();
        assert_eq!(value["type"], "chat");
        assert_eq!(value["ref"], "0xold");
        assert!(value.get("reference").is_none());
    }

    #[test]
    fn test_amend_config() {
        let config = PostConfig::amend("0xold", json!({}), PublishOptions::new("TEST"));
        assert_eq!(config.post_type, AMEND_POST_TYPE);
        assert_eq!(config.reference.as_deref(), Some("0xold"));
    }
}

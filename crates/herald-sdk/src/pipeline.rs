//! Publish pipeline shared by every category client
//!
//! build → resolve content → sign → submit

use crate::account::Account;
use crate::broadcast::{self, Publication};
use crate::error::{Result, SdkError};
use crate::message::{HashedMessage, MessageBuilder};
use crate::resolver;
use crate::types::{ItemType, MessageType};
use herald_gateway_client::GatewayClient;
use serde::Serialize;

/// Options common to every publish call
#[derive(Debug, Clone)]
pub struct PublishOptions {
    /// Channel the message is published on
    pub channel: String,
    /// Declared storage engine for the message content
    pub storage_engine: ItemType,
    /// Ask the gateway to process the message before answering
    pub sync: bool,
    /// Message time in seconds (defaults to now)
    pub time: Option<f64>,
}

impl PublishOptions {
    pub fn new(channel: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            storage_engine: ItemType::Inline,
            sync: false,
            time: None,
        }
    }

    pub fn with_storage_engine(mut self, engine: ItemType) -> Self {
        self.storage_engine = engine;
        self
    }

    pub fn with_sync(mut self, sync: bool) -> Self {
        self.sync = sync;
        self
    }

    pub fn with_time(mut self, time: f64) -> Self {
        self.time = Some(time);
        self
    }

    /// The message time, resolved once so content and envelope agree
    pub fn resolve_time(&self) -> f64 {
        self.time.unwrap_or_else(crate::message::now_seconds)
    }

    /// Check the options without touching the network
    pub fn validate(&self) -> Result<()> {
        if self.channel.trim().is_empty() {
            return Err(SdkError::validation("channel is required"));
        }
        if let Some(time) = self.time {
            if !time.is_finite() || time < 0.0 {
                return Err(SdkError::validation(format!("invalid message time {}", time)));
            }
        }
        Ok(())
    }

    pub(crate) fn builder<C>(&self, message_type: MessageType, content: C, time: f64) -> MessageBuilder<C> {
        MessageBuilder::new(message_type, content)
            .channel(self.channel.clone())
            .time(time)
            .storage_engine(self.storage_engine)
    }
}

/// Drives a draft through the message ladder against one gateway
#[derive(Debug, Clone)]
pub struct MessagePipeline {
    gateway: GatewayClient,
}

impl MessagePipeline {
    pub fn new(gateway: GatewayClient) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &GatewayClient {
        &self.gateway
    }

    /// Build and content-address a message without signing or submitting it
    pub async fn prepare<C: Serialize>(
        &self,
        builder: MessageBuilder<C>,
        account: &dyn Account,
    ) -> Result<HashedMessage<C>> {
        let built = builder.build(account)?;
        resolver::resolve_content(built, &self.gateway).await
    }

    /// Build, content-address, sign and submit a message
    pub async fn publish<C: Serialize>(
        &self,
        builder: MessageBuilder<C>,
        account: &dyn Account,
        sync: bool,
    ) -> Result<Publication<C>> {
        let hashed = self.prepare(builder, account).await?;
        broadcast::broadcast(hashed, account, &self.gateway, sync).await
    }
}

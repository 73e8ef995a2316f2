//! Read access to published messages.

use crate::error::{Result, SdkError};
use crate::message::{PublishedMessage, RawMessage};
use herald_gateway_client::{GatewayClient, GatewayError, MessageQuery, MessageResponse};
use serde::de::DeserializeOwned;
use tracing::debug;

const STATUS_FORGOTTEN: &str = "forgotten";
const STATUS_REJECTED: &str = "rejected";

/// A message as returned by the read API
#[derive(Debug, Clone)]
pub struct StoredMessage<C> {
    pub message: PublishedMessage<C>,
    /// Processing status reported by the gateway (`processed`, `pending`...)
    pub status: String,
    pub reception_time: Option<String>,
}

/// One page of a message listing
#[derive(Debug, Clone)]
pub struct MessagePage<C> {
    pub messages: Vec<PublishedMessage<C>>,
    pub page: u32,
    pub per_page: u32,
    pub total: u64,
}

/// Reads messages from the gateway
#[derive(Debug, Clone)]
pub struct MessageClient {
    gateway: GatewayClient,
}

impl MessageClient {
    pub fn new(gateway: GatewayClient) -> Self {
        Self { gateway }
    }

    /// Client bound to the public gateway
    pub fn with_default_gateway() -> Result<Self> {
        Ok(Self::new(GatewayClient::with_defaults()?))
    }

    /// Fetch one message by item hash
    ///
    /// Forgotten and rejected messages are reported as errors, as is a hash
    /// the gateway does not know.
    pub async fn get<C: DeserializeOwned>(&self, item_hash: &str) -> Result<StoredMessage<C>> {
        let response = match self.gateway.get_message(item_hash).await {
            Ok(response) => response,
            Err(GatewayError::NotFound(_)) => return Err(SdkError::MessageNotFound(item_hash.to_string())),
            Err(e) => return Err(e.into()),
        };

        stored_message(item_hash, response)
    }

    /// List messages matching a query
    pub async fn list<C: DeserializeOwned>(&self, query: &MessageQuery) -> Result<MessagePage<C>> {
        let page = self
            .gateway
            .get_messages(query)
            .await
            .map_err(|e| SdkError::Query(e.to_string()))?;

        let messages = page
            .messages
            .into_iter()
            .map(|value| -> Result<PublishedMessage<C>> {
                let raw: RawMessage = serde_json::from_value(value)?;
                PublishedMessage::try_from(raw)
            })
            .collect::<Result<Vec<_>>>()
            .map_err(|e| SdkError::Query(format!("invalid message in listing: {}", e)))?;

        debug!(count = messages.len(), total = page.pagination_total, "Listed messages");

        Ok(MessagePage {
            messages,
            page: page.pagination_page,
            per_page: page.pagination_per_page,
            total: page.pagination_total,
        })
    }
}

fn stored_message<C: DeserializeOwned>(item_hash: &str, response: MessageResponse) -> Result<StoredMessage<C>> {
    match response.status.as_str() {
        STATUS_FORGOTTEN => {
            return Err(SdkError::ForgottenMessage {
                item_hash: item_hash.to_string(),
                forgotten_by: response.forgotten_by,
            });
        }
        STATUS_REJECTED => {
            return Err(SdkError::RejectedMessage {
                item_hash: item_hash.to_string(),
                detail: response.details,
            });
        }
        _ => {}
    }

    let value = response
        .message
        .ok_or_else(|| SdkError::Query(format!("message {} has no body", item_hash)))?;
    let raw: RawMessage = serde_json::from_value(value)?;

    Ok(StoredMessage {
        message: PublishedMessage::try_from(raw)?,
        status: response.status,
        reception_time: response.reception_time,
    })
}

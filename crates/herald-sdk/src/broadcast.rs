//! Signing and submission of hashed messages
//!
//! Submission goes to `/api/v0/messages`. Gateways that answer 404 or 405
//! only speak the legacy pub/sub protocol; for those the same signed message
//! is sent once to `/api/v0/ipfs/pubsub/pub` and nothing is retried after
//! that.

use crate::account::Account;
use crate::error::{Result, SdkError};
use crate::message::{HashedMessage, PublishedMessage, SignedMessage};
use crate::types::MessageStatus;
use herald_gateway_client::{GatewayClient, GatewayReply};
use serde::Serialize;
use tracing::{debug, info, warn};

/// Outcome of a successful submission
#[derive(Debug, Clone)]
pub struct Publication<C> {
    /// The accepted message
    pub message: PublishedMessage<C>,
    /// Processing status reported by the gateway
    pub status: MessageStatus,
    /// Raw gateway response body
    pub response: serde_json::Value,
}

impl<C> Publication<C> {
    pub fn item_hash(&self) -> &str {
        self.message.item_hash()
    }
}

/// Sign a hashed message with the sender's account
pub async fn sign_message<C>(hashed: HashedMessage<C>, account: &dyn Account) -> Result<SignedMessage<C>> {
    let envelope = hashed.envelope();
    if envelope.chain != account.chain() || envelope.sender != account.address() {
        return Err(SdkError::validation(format!(
            "message from {} on {} cannot be signed by {} on {}",
            envelope.sender,
            envelope.chain,
            account.address(),
            account.chain()
        )));
    }

    let signature = account.sign(&hashed.verification_buffer()).await?;
    hashed.into_signed(signature)
}

/// Sign and submit a hashed message
pub async fn broadcast<C: Serialize>(
    hashed: HashedMessage<C>,
    account: &dyn Account,
    gateway: &GatewayClient,
    sync: bool,
) -> Result<Publication<C>> {
    let signed = sign_message(hashed, account).await?;
    submit(signed, gateway, sync).await
}

/// Submit an already signed message
pub async fn submit<C: Serialize>(
    signed: SignedMessage<C>,
    gateway: &GatewayClient,
    sync: bool,
) -> Result<Publication<C>> {
    debug!(item_hash = %signed.item_hash(), sync, "Broadcasting message");

    match gateway.post_message(&signed, sync).await {
        Ok(reply) => {
            let status = status_from_reply(&reply)?;
            publish(signed, status, reply.body)
        }
        Err(err) => match err.status() {
            Some(404) | Some(405) => {
                warn!(
                    status = ?err.status(),
                    item_hash = %signed.item_hash(),
                    "Gateway does not accept /api/v0/messages, falling back to legacy pub/sub"
                );
                let reply = gateway
                    .post_legacy(&signed)
                    .await
                    .map_err(SdkError::from_submission)?;
                publish(signed, MessageStatus::Pending, reply.body)
            }
            _ => Err(SdkError::from_submission(err)),
        },
    }
}

/// Sign a store message and upload it together with the file it describes
pub async fn broadcast_with_file<C: Serialize>(
    hashed: HashedMessage<C>,
    account: &dyn Account,
    gateway: &GatewayClient,
    file: Vec<u8>,
    file_name: &str,
    sync: bool,
) -> Result<Publication<C>> {
    let signed = sign_message(hashed, account).await?;
    debug!(item_hash = %signed.item_hash(), size = file.len(), sync, "Uploading file with store message");

    let reply = gateway
        .add_file_with_message(file, file_name, &signed, sync)
        .await
        .map_err(SdkError::from_submission)?;

    let status = status_from_reply(&reply)?;
    publish(signed, status, reply.body)
}

fn status_from_reply(reply: &GatewayReply) -> Result<MessageStatus> {
    match reply.status {
        200 => Ok(MessageStatus::Processed),
        202 => Ok(MessageStatus::Pending),
        other => Err(SdkError::Broadcast {
            endpoint: reply.endpoint.clone(),
            status: Some(other),
            message: format!("unexpected response status {}", other),
        }),
    }
}

fn publish<C>(signed: SignedMessage<C>, status: MessageStatus, response: serde_json::Value) -> Result<Publication<C>> {
    let message = signed.into_published(Vec::new(), status == MessageStatus::Processed)?;
    info!(item_hash = %message.item_hash(), status = %status, "Message published");
    Ok(Publication {
        message,
        status,
        response,
    })
}

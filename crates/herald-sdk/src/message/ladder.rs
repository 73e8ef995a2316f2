//! The four message stages: Built → Hashed → Signed → Published
//!
//! Every stage is an immutable value. Transitions consume the previous
//! stage and return a new one, re-running the structural checks each time
//! so that records assembled by hand or decoded from the wire go through
//! the same gate as records produced by the builder.

use crate::error::{Result, SdkError};
use crate::types::{Chain, Confirmation, ItemType, MessageType};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Bytes a signer signs for a message.
///
/// Depends only on the four identity fields, never on content, channel or
/// time.
pub fn verification_buffer(
    chain: Chain,
    sender: &str,
    message_type: MessageType,
    item_hash: &str,
) -> Vec<u8> {
    [chain.as_str(), sender, message_type.as_str(), item_hash]
        .join("\n")
        .into_bytes()
}

/// Fields common to every message
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope<C> {
    pub chain: Chain,
    pub sender: String,
    #[serde(rename = "type")]
    pub message_type: MessageType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    /// Seconds since the Unix epoch
    pub time: f64,
    pub item_type: ItemType,
    pub content: C,
}

impl<C> Envelope<C> {
    fn validate(&self) -> Result<()> {
        if self.sender.trim().is_empty() {
            return Err(SdkError::validation("sender must not be empty"));
        }
        if matches!(self.channel.as_deref(), Some(c) if c.is_empty()) {
            return Err(SdkError::validation("channel must not be empty when set"));
        }
        if !self.time.is_finite() || self.time < 0.0 {
            return Err(SdkError::validation(format!("invalid message time {}", self.time)));
        }
        Ok(())
    }
}

// ============================================================================
// Built
// ============================================================================

/// Unsigned draft, not yet content-addressed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuiltMessage<C> {
    #[serde(flatten)]
    envelope: Envelope<C>,
}

impl<C> BuiltMessage<C> {
    pub fn new(envelope: Envelope<C>) -> Result<Self> {
        envelope.validate()?;
        Ok(Self { envelope })
    }

    pub fn envelope(&self) -> &Envelope<C> {
        &self.envelope
    }

    pub fn content(&self) -> &C {
        &self.envelope.content
    }

    /// Storage engine declared at build time
    pub fn item_type(&self) -> ItemType {
        self.envelope.item_type
    }

    pub fn message_type(&self) -> MessageType {
        self.envelope.message_type
    }

    /// Attach the content identifier, possibly switching the storage engine
    pub fn into_hashed(
        self,
        item_type: ItemType,
        item_hash: String,
        item_content: Option<String>,
    ) -> Result<HashedMessage<C>> {
        let mut envelope = self.envelope;
        envelope.item_type = item_type;
        HashedMessage::new(envelope, item_hash, item_content)
    }
}

// ============================================================================
// Hashed
// ============================================================================

/// Content-addressed message, ready to be signed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HashedMessage<C> {
    #[serde(flatten)]
    envelope: Envelope<C>,
    item_hash: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    item_content: Option<String>,
}

impl<C> HashedMessage<C> {
    pub fn new(envelope: Envelope<C>, item_hash: String, item_content: Option<String>) -> Result<Self> {
        envelope.validate()?;

        if item_hash.is_empty() {
            return Err(SdkError::validation("item_hash must not be empty"));
        }
        match (envelope.item_type, item_content.as_deref()) {
            (ItemType::Inline, None) | (ItemType::Inline, Some("")) => {
                return Err(SdkError::validation(
                    "inline message requires a non-empty item_content",
                ));
            }
            (ItemType::Storage | ItemType::Ipfs, Some(_)) => {
                return Err(SdkError::validation(format!(
                    "{} message must not carry item_content",
                    envelope.item_type
                )));
            }
            _ => {}
        }

        Ok(Self {
            envelope,
            item_hash,
            item_content,
        })
    }

    pub fn envelope(&self) -> &Envelope<C> {
        &self.envelope
    }

    pub fn content(&self) -> &C {
        &self.envelope.content
    }

    pub fn item_type(&self) -> ItemType {
        self.envelope.item_type
    }

    pub fn item_hash(&self) -> &str {
        &self.item_hash
    }

    pub fn item_content(&self) -> Option<&str> {
        self.item_content.as_deref()
    }

    pub fn verification_buffer(&self) -> Vec<u8> {
        verification_buffer(
            self.envelope.chain,
            &self.envelope.sender,
            self.envelope.message_type,
            &self.item_hash,
        )
    }

    pub fn into_signed(self, signature: String) -> Result<SignedMessage<C>> {
        SignedMessage::new(self, signature)
    }
}

// ============================================================================
// Signed
// ============================================================================

/// Hashed message plus the sender's signature
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignedMessage<C> {
    #[serde(flatten)]
    hashed: HashedMessage<C>,
    signature: String,
}

impl<C> SignedMessage<C> {
    pub fn new(hashed: HashedMessage<C>, signature: String) -> Result<Self> {
        // Re-run the hashed checks on values that did not come through HashedMessage::new
        let hashed = HashedMessage::new(hashed.envelope, hashed.item_hash, hashed.item_content)?;
        if signature.trim().is_empty() {
            return Err(SdkError::validation("signature must not be empty"));
        }
        Ok(Self { hashed, signature })
    }

    pub fn hashed(&self) -> &HashedMessage<C> {
        &self.hashed
    }

    pub fn envelope(&self) -> &Envelope<C> {
        &self.hashed.envelope
    }

    pub fn item_hash(&self) -> &str {
        &self.hashed.item_hash
    }

    pub fn signature(&self) -> &str {
        &self.signature
    }

    pub fn into_published(self, confirmations: Vec<Confirmation>, confirmed: bool) -> Result<PublishedMessage<C>> {
        PublishedMessage::new(self, confirmations, confirmed)
    }
}

// ============================================================================
// Published
// ============================================================================

/// Signed message accepted by the network
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublishedMessage<C> {
    #[serde(flatten)]
    signed: SignedMessage<C>,
    confirmations: Vec<Confirmation>,
    confirmed: bool,
}

impl<C> PublishedMessage<C> {
    pub fn new(signed: SignedMessage<C>, confirmations: Vec<Confirmation>, confirmed: bool) -> Result<Self> {
        let SignedMessage { hashed, signature } = signed;
        let signed = SignedMessage::new(hashed, signature)?;
        Ok(Self {
            signed,
            confirmations,
            confirmed,
        })
    }

    pub fn signed(&self) -> &SignedMessage<C> {
        &self.signed
    }

    pub fn envelope(&self) -> &Envelope<C> {
        &self.signed.hashed.envelope
    }

    pub fn content(&self) -> &C {
        &self.signed.hashed.envelope.content
    }

    pub fn chain(&self) -> Chain {
        self.envelope().chain
    }

    pub fn sender(&self) -> &str {
        &self.envelope().sender
    }

    pub fn message_type(&self) -> MessageType {
        self.envelope().message_type
    }

    pub fn channel(&self) -> Option<&str> {
        self.envelope().channel.as_deref()
    }

    pub fn time(&self) -> f64 {
        self.envelope().time
    }

    pub fn item_type(&self) -> ItemType {
        self.envelope().item_type
    }

    pub fn item_hash(&self) -> &str {
        &self.signed.hashed.item_hash
    }

    pub fn item_content(&self) -> Option<&str> {
        self.signed.hashed.item_content.as_deref()
    }

    pub fn signature(&self) -> &str {
        &self.signed.signature
    }

    pub fn confirmations(&self) -> &[Confirmation] {
        &self.confirmations
    }

    pub fn confirmed(&self) -> bool {
        self.confirmed
    }
}

// ============================================================================
// Wire decoding
// ============================================================================

/// Loosely typed message as found on the wire
///
/// Enumerated fields are plain strings here; converting into a ladder stage
/// validates them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawMessage {
    pub chain: String,
    pub sender: String,
    #[serde(rename = "type")]
    pub message_type: String,
    #[serde(default)]
    pub channel: Option<String>,
    pub time: f64,
    pub item_type: String,
    #[serde(default)]
    pub item_hash: String,
    #[serde(default)]
    pub item_content: Option<String>,
    #[serde(default)]
    pub content: Option<serde_json::Value>,
    #[serde(default)]
    pub signature: String,
    #[serde(default)]
    pub confirmations: Option<Vec<RawConfirmation>>,
    #[serde(default)]
    pub confirmed: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawConfirmation {
    pub chain: String,
    pub height: u64,
    pub hash: String,
}

impl RawMessage {
    fn envelope<C: DeserializeOwned>(&self) -> Result<Envelope<C>> {
        let content = match (&self.content, &self.item_content) {
            (Some(content), _) => content.clone(),
            (None, Some(item_content)) if !item_content.is_empty() => serde_json::from_str(item_content)?,
            _ => serde_json::Value::Null,
        };

        Ok(Envelope {
            chain: self.chain.parse()?,
            sender: self.sender.clone(),
            message_type: self.message_type.parse()?,
            channel: self.channel.clone(),
            time: self.time,
            item_type: self.item_type.parse()?,
            content: serde_json::from_value(content)?,
        })
    }
}

impl<C: DeserializeOwned> TryFrom<RawMessage> for HashedMessage<C> {
    type Error = SdkError;

    fn try_from(raw: RawMessage) -> Result<Self> {
        let envelope = raw.envelope()?;
        HashedMessage::new(envelope, raw.item_hash, raw.item_content)
    }
}

impl<C: DeserializeOwned> TryFrom<RawMessage> for SignedMessage<C> {
    type Error = SdkError;

    fn try_from(raw: RawMessage) -> Result<Self> {
        let signature = raw.signature.clone();
        let hashed = HashedMessage::try_from(raw)?;
        SignedMessage::new(hashed, signature)
    }
}

impl<C: DeserializeOwned> TryFrom<RawMessage> for PublishedMessage<C> {
    type Error = SdkError;

    fn try_from(mut raw: RawMessage) -> Result<Self> {
        let confirmations = raw
            .confirmations
            .take()
            .unwrap_or_default()
            .into_iter()
            .map(|c| -> Result<Confirmation> {
                Ok(Confirmation {
                    chain: c.chain.parse()?,
                    height: c.height,
                    hash: c.hash,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        let confirmed = raw.confirmed.unwrap_or(!confirmations.is_empty());

        let signed = SignedMessage::try_from(raw)?;
        PublishedMessage::new(signed, confirmations, confirmed)
    }
}

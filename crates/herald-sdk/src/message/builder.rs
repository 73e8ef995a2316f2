//! Message builder
//!
//! Assembles a [`BuiltMessage`] from an account, a channel and a content
//! payload. Pure: no I/O, no clock reads once a time has been set.

use super::ladder::{BuiltMessage, Envelope};
use crate::account::Account;
use crate::error::{Result, SdkError};
use crate::types::{ItemType, MessageType};

/// Current time in seconds since the Unix epoch, with microsecond precision
pub fn now_seconds() -> f64 {
    chrono::Utc::now().timestamp_micros() as f64 / 1_000_000.0
}

/// Builder for unsigned message drafts
///
/// # Example
///
/// ```rust
/// use herald_sdk::{MessageBuilder, MessageType, ItemType, MockAccount};
///
/// let account = MockAccount::default();
/// let built = MessageBuilder::new(MessageType::Post, serde_json::json!({"a": 1}))
///     .channel("TEST")
///     .storage_engine(ItemType::Inline)
///     .build(&account)
///     .unwrap();
///
/// assert_eq!(built.envelope().channel.as_deref(), Some("TEST"));
/// ```
#[derive(Debug, Clone)]
pub struct MessageBuilder<C> {
    message_type: MessageType,
    content: C,
    channel: Option<String>,
    time: Option<f64>,
    item_type: ItemType,
}

impl<C> MessageBuilder<C> {
    /// Start a draft of the given category
    pub fn new(message_type: MessageType, content: C) -> Self {
        Self {
            message_type,
            content,
            channel: None,
            time: None,
            item_type: ItemType::Inline,
        }
    }

    /// Set the channel (required)
    pub fn channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = Some(channel.into());
        self
    }

    /// Set the message time in seconds (defaults to now)
    pub fn time(mut self, time: f64) -> Self {
        self.time = Some(time);
        self
    }

    /// Declare the storage engine (defaults to inline)
    pub fn storage_engine(mut self, item_type: ItemType) -> Self {
        self.item_type = item_type;
        self
    }

    /// Produce the draft for the given account
    pub fn build(self, account: &dyn Account) -> Result<BuiltMessage<C>> {
        let channel = match self.channel {
            Some(channel) if !channel.trim().is_empty() => channel,
            _ => return Err(SdkError::validation("channel is required")),
        };

        BuiltMessage::new(Envelope {
            chain: account.chain(),
            sender: account.address().to_string(),
            message_type: self.message_type,
            channel: Some(channel),
            time: self.time.unwrap_or_else(now_seconds),
            item_type: self.item_type,
            content: self.content,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::MockAccount;
    use crate::types::Chain;
    use serde_json::json;

    #[test]
    fn test_build_uses_account_identity() {
        let account = MockAccount::new(Chain::Dot, "dot-address");
        let built = MessageBuilder::new(MessageType::Aggregate, json!({"k": "v"}))
            .channel("TEST")
            .time(10.0)
            .build(&account)
            .unwrap();

        let envelope = built.envelope();
        assert_eq!(envelope.chain, Chain::Dot);
        assert_eq!(envelope.sender, "dot-address");
        assert_eq!(envelope.message_type, MessageType::Aggregate);
        assert_eq!(envelope.time, 10.0);
        assert_eq!(envelope.item_type, ItemType::Inline);
    }

    #[test]
    fn test_build_requires_channel() {
        let account = MockAccount::default();

        let missing = MessageBuilder::new(MessageType::Post, json!({})).build(&account);
        assert!(matches!(missing, Err(SdkError::Validation(_))));

        let blank = MessageBuilder::new(MessageType::Post, json!({}))
            .channel("  ")
            .build(&account);
        assert!(blank.is_err());
    }

    #[test]
    fn test_build_defaults_time_to_now() {
        let before = now_seconds();
        let built = MessageBuilder::new(MessageType::Post, json!({}))
            .channel("TEST")
            .build(&MockAccount::default())
            .unwrap();
        let after = now_seconds();

        assert!(built.envelope().time >= before && built.envelope().time <= after);
    }

    #[test]
    fn test_built_has_no_hash_or_signature() {
        let built = MessageBuilder::new(MessageType::Post, json!({"a": 1}))
            .channel("TEST")
            .time(1.0)
            .build(&MockAccount::default())
            .unwrap();

        let value = serde_json::to_value(&built).unwrap();
        assert!(value.get("item_hash").is_none());
        assert!(value.get("item_content").is_none());
        assert!(value.get("signature").is_none());
        assert!(value.get("confirmed").is_none());
    }
}

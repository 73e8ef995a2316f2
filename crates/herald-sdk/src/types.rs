//! Closed enumerations shared by every message
//!
//! Each enum serializes to the exact string the gateway expects and parses
//! back through [`FromStr`], failing on anything outside the set.

use crate::error::SdkError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Network an account belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Chain {
    Avax,
    Base,
    Bsc,
    Csdk,
    Dot,
    Eth,
    Neo,
    Nuls,
    Nuls2,
    Sol,
    Tezos,
}

impl Chain {
    pub const ALL: [Chain; 11] = [
        Chain::Avax,
        Chain::Base,
        Chain::Bsc,
        Chain::Csdk,
        Chain::Dot,
        Chain::Eth,
        Chain::Neo,
        Chain::Nuls,
        Chain::Nuls2,
        Chain::Sol,
        Chain::Tezos,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Chain::Avax => "AVAX",
            Chain::Base => "BASE",
            Chain::Bsc => "BSC",
            Chain::Csdk => "CSDK",
            Chain::Dot => "DOT",
            Chain::Eth => "ETH",
            Chain::Neo => "NEO",
            Chain::Nuls => "NULS",
            Chain::Nuls2 => "NULS2",
            Chain::Sol => "SOL",
            Chain::Tezos => "TEZOS",
        }
    }
}

/// Message category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MessageType {
    Post,
    Aggregate,
    Store,
    Program,
    Forget,
    Instance,
}

impl MessageType {
    pub const ALL: [MessageType; 6] = [
        MessageType::Post,
        MessageType::Aggregate,
        MessageType::Store,
        MessageType::Program,
        MessageType::Forget,
        MessageType::Instance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MessageType::Post => "POST",
            MessageType::Aggregate => "AGGREGATE",
            MessageType::Store => "STORE",
            MessageType::Program => "PROGRAM",
            MessageType::Forget => "FORGET",
            MessageType::Instance => "INSTANCE",
        }
    }

    /// Serialized content must be strictly smaller than this to stay inline
    ///
    /// For store messages this applies to the message body only; the file
    /// itself is never inline.
    pub fn inline_threshold(&self) -> usize {
        match self {
            MessageType::Post => 50_000,
            MessageType::Aggregate => 50_000,
            MessageType::Store => 50_000,
            MessageType::Program => 50_000,
            MessageType::Forget => 50_000,
            MessageType::Instance => 50_000,
        }
    }
}

/// How the content of a message is carried
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    /// Embedded in the message as `item_content`
    Inline,
    /// Pushed to the gateway's storage engine
    Storage,
    /// Pushed to IPFS through the gateway
    Ipfs,
}

impl ItemType {
    pub const ALL: [ItemType; 3] = [ItemType::Inline, ItemType::Storage, ItemType::Ipfs];

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Inline => "inline",
            ItemType::Storage => "storage",
            ItemType::Ipfs => "ipfs",
        }
    }

    pub fn is_inline(&self) -> bool {
        *self == ItemType::Inline
    }
}

impl Default for ItemType {
    fn default() -> Self {
        ItemType::Inline
    }
}

/// Processing status reported by the gateway after submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    /// Accepted and processed synchronously
    Processed,
    /// Accepted, processing happens later
    Pending,
}

impl MessageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageStatus::Processed => "processed",
            MessageStatus::Pending => "pending",
        }
    }
}

/// On-chain confirmation receipt of a message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Confirmation {
    pub chain: Chain,
    pub height: u64,
    pub hash: String,
}

macro_rules! closed_enum_str {
    ($ty:ident, $what:literal) => {
        impl FromStr for $ty {
            type Err = SdkError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $ty::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str() == s)
                    .ok_or_else(|| SdkError::validation(format!("unknown {}: {:?}", $what, s)))
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }
    };
}

closed_enum_str!(Chain, "chain");
closed_enum_str!(MessageType, "message type");
closed_enum_str!(ItemType, "item type");

impl fmt::Display for MessageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

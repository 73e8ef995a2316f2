//! Herald SDK - signed message publishing for the Herald network
//!
//! Builds, content-addresses, signs and broadcasts messages through a
//! Herald gateway.
//!
//! # Architecture
//!
//! Every publish goes through the same pipeline:
//! - **Builder**: assembles an unsigned draft from an account, channel and content
//! - **Resolver**: serializes the content, keeps it inline when small or pushes
//!   it to a storage engine, and computes the item hash
//! - **Broadcaster**: asks the [`Account`] to sign the verification buffer and
//!   submits the signed message, falling back once to the legacy pub/sub
//!   endpoint on gateways that lack the primary one
//!
//! Messages move through typed stages (`BuiltMessage` → `HashedMessage` →
//! `SignedMessage` → `PublishedMessage`); each transition re-validates.
//!
//! # Example
//!
//! ```rust,no_run
//! use herald_sdk::{HeraldClient, GatewayConfig, MockAccount, PostConfig, PublishOptions};
//!
//! # async fn example() -> herald_sdk::Result<()> {
//! let client = HeraldClient::new(GatewayConfig::new("http://localhost:4024"))?;
//! let account = MockAccount::default();
//!
//! let publication = client
//!     .posts()
//!     .send(&account, PostConfig::new("chat", serde_json::json!({"a": 1}), PublishOptions::new("TEST")))
//!     .await?;
//!
//! println!("{} is {}", publication.item_hash(), publication.status);
//! # Ok(())
//! # }
//! ```

// Signing capability
pub mod account;

// Signing and submission
pub mod broadcast;

// Per-category clients
pub mod categories;

// Facade over the category clients
pub mod client;

// Error types
pub mod error;

// Message stages and builder
pub mod message;

// Shared publish pipeline
pub mod pipeline;

// Content addressing and storage push
pub mod resolver;

// Closed enumerations
pub mod types;

pub use account::{Account, MockAccount};
pub use broadcast::{broadcast, broadcast_with_file, sign_message, submit, Publication};
pub use categories::*;
pub use client::HeraldClient;
pub use error::{Result, SdkError};
pub use message::{
    now_seconds, verification_buffer, BuiltMessage, Envelope, HashedMessage, MessageBuilder, PublishedMessage,
    RawConfirmation, RawMessage, SignedMessage,
};
pub use pipeline::{MessagePipeline, PublishOptions};
pub use resolver::{resolve_content, resolve_file, FileReference};
pub use types::{Chain, Confirmation, ItemType, MessageStatus, MessageType};

// Re-export from the gateway client
pub use herald_gateway_client::{GatewayClient, GatewayConfig, GatewayError, MessageQuery};

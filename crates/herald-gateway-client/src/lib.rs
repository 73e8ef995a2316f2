//! Rust client for the Herald gateway HTTP API
//!
//! Covers message submission (primary and legacy pub/sub endpoints), the
//! storage engines (`add_json`, `add_file`, raw downloads) and the message
//! read endpoints. Message bodies are accepted as any `Serialize` value;
//! building and signing them is the job of `herald-sdk`.
//!
//! # Example
//!
//! ```rust,no_run
//! use herald_gateway_client::{GatewayClient, GatewayConfig, MessageQuery};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = GatewayClient::new(GatewayConfig {
//!     base_url: "http://localhost:4024".into(),
//!     ..Default::default()
//! })?;
//!
//! let page = client
//!     .get_messages(&MessageQuery::new().with_channels(vec!["TEST".into()]))
//!     .await?;
//! println!("{} messages", page.pagination_total);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod types;

// Re-export main types
pub use client::GatewayClient;
pub use error::{GatewayError, Result};
pub use types::*;

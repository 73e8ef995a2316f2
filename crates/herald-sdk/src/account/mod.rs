//! Signing capability
//!
//! The SDK never touches keys. Anything that can report its address and
//! chain and sign a byte buffer can publish messages; per-chain wallets
//! implement [`Account`] outside this crate.

pub mod mock;

use crate::error::Result;
use crate::types::Chain;
use async_trait::async_trait;

pub use mock::MockAccount;

/// An account able to sign messages.
///
/// `sign` receives the verification buffer of a hashed message and returns
/// the signature in the chain's own string encoding. Failures should be
/// reported as [`SdkError::Signing`](crate::SdkError::Signing).
#[async_trait]
pub trait Account: Send + Sync {
    /// Address that will appear as the message sender
    fn address(&self) -> &str;

    /// Chain the address belongs to
    fn chain(&self) -> Chain;

    /// Sign a verification buffer
    async fn sign(&self, buffer: &[u8]) -> Result<String>;
}

//! Mock account for testing.

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Mutex;

use super::Account;
use crate::error::{Result, SdkError};
use crate::types::Chain;

/// Mock account for testing.
///
/// Signs deterministically (`0x` + sha256 of address and buffer) and records
/// every buffer it was asked to sign.
pub struct MockAccount {
    address: String,
    chain: Chain,
    failing: AtomicBool,
    call_count: AtomicU32,
    signed: Mutex<Vec<Vec<u8>>>,
}

impl MockAccount {
    /// Create a new mock account.
    pub fn new(chain: Chain, address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            chain,
            failing: AtomicBool::new(false),
            call_count: AtomicU32::new(0),
            signed: Mutex::new(Vec::new()),
        }
    }

    /// Make every signing attempt fail.
    pub fn with_failure(self, failing: bool) -> Self {
        self.failing.store(failing, Ordering::SeqCst);
        self
    }

    /// Signature this account produces for a buffer.
    pub fn signature_for(&self, buffer: &[u8]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.address.as_bytes());
        hasher.update(buffer);
        format!("0x{}", hex::encode(hasher.finalize()))
    }

    /// Get the number of times sign was called.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Buffers signed so far, oldest first.
    pub fn signed_buffers(&self) -> Vec<Vec<u8>> {
        self.signed.lock().map(|b| b.clone()).unwrap_or_default()
    }
}

impl Default for MockAccount {
    fn default() -> Self {
        Self::new(Chain::Eth, "0x0000000000000000000000000000000000000001")
    }
}

#[async_trait]
impl Account for MockAccount {
    fn address(&self) -> &str {
        &self.address
    }

    fn chain(&self) -> Chain {
        self.chain
    }

    async fn sign(&self, buffer: &[u8]) -> Result<String> {
        self.call_count.fetch_add(1, Ordering::SeqCst);

        if self.failing.load(Ordering::SeqCst) {
            return Err(SdkError::Signing("mock account disabled".to_string()));
        }

        if let Ok(mut signed) = self.signed.lock() {
            signed.push(buffer.to_vec());
        }
        Ok(self.signature_for(buffer))
    }
}

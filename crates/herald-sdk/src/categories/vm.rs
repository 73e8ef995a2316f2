//! Pieces shared by program and instance messages

use crate::types::Chain;
use serde::{Deserialize, Serialize};

/// Compute resources requested for a virtual machine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineResources {
    pub vcpus: u32,
    /// Memory in MiB
    pub memory: u64,
    /// Timeout in seconds
    pub seconds: u64,
}

impl MachineResources {
    pub fn new(vcpus: u32, memory: u64, seconds: u64) -> Self {
        Self {
            vcpus,
            memory,
            seconds,
        }
    }
}

/// Reference to another message, optionally following its amendments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeReference {
    #[serde(rename = "ref")]
    pub reference: String,
    pub use_latest: bool,
}

/// How the machine is paid for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentType {
    /// Tokens held on the sender's account
    Hold,
    /// Streamed payment to a receiver
    Superfluid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub chain: Chain,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver: Option<String>,
    #[serde(rename = "type")]
    pub payment_type: PaymentType,
}

impl Payment {
    pub fn hold(chain: Chain) -> Self {
        Self {
            chain,
            receiver: None,
            payment_type: PaymentType::Hold,
        }
    }

    pub fn stream(chain: Chain, receiver: impl Into<String>) -> Self {
        Self {
            chain,
            receiver: Some(receiver.into()),
            payment_type: PaymentType::Superfluid,
        }
    }
}

pub(crate) fn validate_resources(resources: &MachineResources) -> crate::error::Result<()> {
    if resources.vcpus == 0 || resources.memory == 0 || resources.seconds == 0 {
        return Err(crate::error::SdkError::validation(format!(
            "machine resources must be non-zero, got {:?}",
            resources
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_wire_format() {
        let value = serde_json::to_value(Payment::stream(Chain::Avax, "0xreceiver")).unwrap();
        assert_eq!(value["type"], "superfluid");
        assert_eq!(value["chain"], "AVAX");
        assert_eq!(value["receiver"], "0xreceiver");

        let value = serde_json::to_value(Payment::hold(Chain::Eth)).unwrap();
        assert!(value.get("receiver").is_none());
    }

    #[test]
    fn test_zero_resources_rejected() {
        assert!(validate_resources(&MachineResources::new(1, 128, 30)).is_ok());
        assert!(validate_resources(&MachineResources::new(0, 128, 30)).is_err());
    }
}

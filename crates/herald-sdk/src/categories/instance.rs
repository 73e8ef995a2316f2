//! Instance messages: request a long-running virtual machine.

use super::vm::{validate_resources, MachineResources, Payment, VolumeReference};
use crate::account::Account;
use crate::broadcast::Publication;
use crate::error::{Result, SdkError};
use crate::pipeline::{MessagePipeline, PublishOptions};
use crate::types::MessageType;
use herald_gateway_client::GatewayClient;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Virtualization backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Hypervisor {
    Firecracker,
    Qemu,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceEnvironment {
    pub internet: bool,
    pub network_api: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hypervisor: Option<Hypervisor>,
    pub reproducible: bool,
    pub shared_cache: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootfsVolume {
    pub parent: VolumeReference,
    pub persistence: String,
    pub size_mib: u64,
}

/// Content of an instance message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceContent {
    pub address: String,
    pub time: f64,
    pub allow_amend: bool,
    pub environment: InstanceEnvironment,
    pub resources: MachineResources,
    pub rootfs: RootfsVolume,
    pub authorized_keys: Vec<String>,
    pub volumes: Vec<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variables: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment: Option<Payment>,
}

/// Arguments of [`InstanceClient::send`]
#[derive(Debug, Clone)]
pub struct InstanceConfig {
    /// Hash of the root filesystem image to start from
    pub rootfs: String,
    pub rootfs_size_mib: u64,
    pub authorized_keys: Vec<String>,
    pub resources: MachineResources,
    pub internet: bool,
    pub hypervisor: Option<Hypervisor>,
    pub allow_amend: bool,
    pub variables: Option<BTreeMap<String, String>>,
    pub metadata: Option<serde_json::Value>,
    pub volumes: Vec<serde_json::Value>,
    pub payment: Option<Payment>,
    pub options: PublishOptions,
}

impl InstanceConfig {
    pub fn new(rootfs: impl Into<String>, options: PublishOptions) -> Self {
        Self {
            rootfs: rootfs.into(),
            rootfs_size_mib: 20_480,
            authorized_keys: Vec::new(),
            resources: MachineResources::new(1, 2048, 30),
            internet: true,
            hypervisor: None,
            allow_amend: false,
            variables: None,
            metadata: None,
            volumes: Vec::new(),
            payment: None,
            options,
        }
    }

    pub fn with_authorized_keys(mut self, keys: Vec<String>) -> Self {
        self.authorized_keys = keys;
        self
    }

    pub fn with_resources(mut self, resources: MachineResources) -> Self {
        self.resources = resources;
        self
    }

    pub fn with_rootfs_size_mib(mut self, size_mib: u64) -> Self {
        self.rootfs_size_mib = size_mib;
        self
    }

    pub fn with_hypervisor(mut self, hypervisor: Hypervisor) -> Self {
        self.hypervisor = Some(hypervisor);
        self
    }

    pub fn with_payment(mut self, payment: Payment) -> Self {
        self.payment = Some(payment);
        self
    }
}

/// Publishes instance messages
#[derive(Debug, Clone)]
pub struct InstanceClient {
    pipeline: MessagePipeline,
}

impl InstanceClient {
    pub fn new(gateway: GatewayClient) -> Self {
        Self {
            pipeline: MessagePipeline::new(gateway),
        }
    }

    /// Client bound to the public gateway
    pub fn with_default_gateway() -> Result<Self> {
        Ok(Self::new(GatewayClient::with_defaults()?))
    }

    pub async fn send(&self, account: &dyn Account, config: InstanceConfig) -> Result<Publication<InstanceContent>> {
        if config.rootfs.trim().is_empty() {
            return Err(SdkError::validation("instance rootfs must not be empty"));
        }
        if config.rootfs_size_mib == 0 {
            return Err(SdkError::validation("instance rootfs size must be non-zero"));
        }
        validate_resources(&config.resources)?;

        let time = config.options.resolve_time();
        let content = InstanceContent {
            address: account.address().to_string(),
            time,
            allow_amend: config.allow_amend,
            environment: InstanceEnvironment {
                internet: config.internet,
                network_api: true,
                hypervisor: config.hypervisor,
                reproducible: false,
                shared_cache: false,
            },
            resources: config.resources,
            rootfs: RootfsVolume {
                parent: VolumeReference {
                    reference: config.rootfs,
                    use_latest: true,
                },
                persistence: "host".to_string(),
                size_mib: config.rootfs_size_mib,
            },
            authorized_keys: config.authorized_keys,
            volumes: config.volumes,
            variables: config.variables,
            metadata: config.metadata,
            payment: config.payment,
        };

        let builder = config.options.builder(MessageType::Instance, content, time);
        self.pipeline.publish(builder, account, config.options.sync).await
    }
}

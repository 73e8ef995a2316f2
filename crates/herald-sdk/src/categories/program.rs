//! Program messages: deploy a function that runs on demand.
//!
//! The code archive is published first as a store message; the program
//! message then points at that store message by hash.

use super::store::{StoreClient, StoreConfig, StoreContent};
use super::vm::{validate_resources, MachineResources, Payment, VolumeReference};
use crate::account::Account;
use crate::broadcast::Publication;
use crate::error::{Result, SdkError};
use crate::pipeline::{MessagePipeline, PublishOptions};
use crate::types::{ItemType, MessageType};
use herald_gateway_client::GatewayClient;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

const PROGRAM_TYPE: &str = "vm-function";

/// Packaging of the code archive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodeEncoding {
    Plain,
    Zip,
    Squashfs,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeContent {
    pub encoding: CodeEncoding,
    pub entrypoint: String,
    /// Hash of the store message holding the code
    #[serde(rename = "ref")]
    pub reference: String,
    pub use_latest: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionTriggers {
    pub http: bool,
    pub persistent: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionEnvironment {
    pub reproducible: bool,
    pub internet: bool,
    pub network_api: bool,
    pub shared_cache: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeReference {
    #[serde(rename = "ref")]
    pub reference: String,
    pub use_latest: bool,
    pub comment: String,
}

/// Content of a program message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramContent {
    pub address: String,
    pub time: f64,
    #[serde(rename = "type")]
    pub program_type: String,
    pub allow_amend: bool,
    pub code: CodeContent,
    pub on: FunctionTriggers,
    pub environment: FunctionEnvironment,
    pub resources: MachineResources,
    pub runtime: RuntimeReference,
    pub volumes: Vec<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variables: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment: Option<Payment>,
}

/// Arguments of [`ProgramClient::send`]
#[derive(Debug, Clone)]
pub struct ProgramConfig {
    /// Code archive bytes
    pub code: Vec<u8>,
    pub encoding: CodeEncoding,
    pub entrypoint: String,
    /// Runtime the program runs on
    pub runtime: VolumeReference,
    pub resources: MachineResources,
    /// Keep the machine running between calls
    pub persistent: bool,
    pub internet: bool,
    pub allow_amend: bool,
    pub variables: Option<BTreeMap<String, String>>,
    pub metadata: Option<serde_json::Value>,
    pub volumes: Vec<serde_json::Value>,
    pub payment: Option<Payment>,
    /// Engine used for the code archive
    pub code_engine: ItemType,
    pub options: PublishOptions,
}

impl ProgramConfig {
    pub fn new(
        code: Vec<u8>,
        entrypoint: impl Into<String>,
        runtime_ref: impl Into<String>,
        options: PublishOptions,
    ) -> Self {
        Self {
            code,
            encoding: CodeEncoding::Zip,
            entrypoint: entrypoint.into(),
            runtime: VolumeReference {
                reference: runtime_ref.into(),
                use_latest: true,
            },
            resources: MachineResources::new(1, 128, 30),
            persistent: false,
            internet: true,
            allow_amend: false,
            variables: None,
            metadata: None,
            volumes: Vec::new(),
            payment: None,
            code_engine: ItemType::Storage,
            options,
        }
    }

    pub fn with_encoding(mut self, encoding: CodeEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn with_resources(mut self, resources: MachineResources) -> Self {
        self.resources = resources;
        self
    }

    pub fn with_persistent(mut self, persistent: bool) -> Self {
        self.persistent = persistent;
        self
    }

    pub fn with_variables(mut self, variables: BTreeMap<String, String>) -> Self {
        self.variables = Some(variables);
        self
    }

    pub fn with_payment(mut self, payment: Payment) -> Self {
        self.payment = Some(payment);
        self
    }
}

/// Publishes program messages
#[derive(Debug, Clone)]
pub struct ProgramClient {
    pipeline: MessagePipeline,
}

impl ProgramClient {
    pub fn new(gateway: GatewayClient) -> Self {
        Self {
            pipeline: MessagePipeline::new(gateway),
        }
    }

    /// Client bound to the public gateway
    pub fn with_default_gateway() -> Result<Self> {
        Ok(Self::new(GatewayClient::with_defaults()?))
    }

    /// Publish the code archive, then the program that runs it
    ///
    /// Returns the store publication of the code together with the program
    /// publication.
    pub async fn send(
        &self,
        account: &dyn Account,
        config: ProgramConfig,
    ) -> Result<(Publication<StoreContent>, Publication<ProgramContent>)> {
        if config.entrypoint.trim().is_empty() {
            return Err(SdkError::validation("program entrypoint must not be empty"));
        }
        if config.code.is_empty() {
            return Err(SdkError::validation("program code must not be empty"));
        }
        validate_resources(&config.resources)?;

        let time = config.options.resolve_time();
        let store = StoreClient::from_pipeline(self.pipeline.clone());
        let code_options = PublishOptions::new(config.options.channel.clone())
            .with_sync(config.options.sync)
            .with_time(time);
        let code = store
            .send(
                account,
                StoreConfig::from_bytes(config.code, code_options)
                    .with_file_name("code")
                    .with_file_engine(config.code_engine),
            )
            .await?;
        debug!(code_ref = %code.item_hash(), "Program code stored");

        let content = ProgramContent {
            address: account.address().to_string(),
            time,
            program_type: PROGRAM_TYPE.to_string(),
            allow_amend: config.allow_amend,
            code: CodeContent {
                encoding: config.encoding,
                entrypoint: config.entrypoint,
                reference: code.item_hash().to_string(),
                use_latest: true,
            },
            on: FunctionTriggers {
                http: true,
                persistent: config.persistent,
            },
            environment: FunctionEnvironment {
                reproducible: false,
                internet: config.internet,
                network_api: true,
                shared_cache: false,
            },
            resources: config.resources,
            runtime: RuntimeReference {
                reference: config.runtime.reference,
                use_latest: config.runtime.use_latest,
                comment: String::new(),
            },
            volumes: config.volumes,
            variables: config.variables,
            metadata: config.metadata,
            payment: config.payment,
        };

        let builder = config.options.builder(MessageType::Program, content, time);
        let program = self.pipeline.publish(builder, account, config.options.sync).await?;
        Ok((code, program))
    }
}

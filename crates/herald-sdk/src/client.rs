//! One entry point for every category client

use crate::categories::{
    AggregateClient, ForgetClient, InstanceClient, MessageClient, PostClient, ProgramClient, StoreClient,
};
use crate::error::Result;
use herald_gateway_client::{GatewayClient, GatewayConfig};

/// Hands out category clients that share one gateway connection pool
#[derive(Debug, Clone)]
pub struct HeraldClient {
    gateway: GatewayClient,
}

impl HeraldClient {
    pub fn new(config: GatewayConfig) -> Result<Self> {
        Ok(Self {
            gateway: GatewayClient::new(config)?,
        })
    }

    /// Client configured from `HERALD_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(GatewayConfig::from_env())
    }

    pub fn from_gateway(gateway: GatewayClient) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &GatewayClient {
        &self.gateway
    }

    pub fn posts(&self) -> PostClient {
        PostClient::new(self.gateway.clone())
    }

    pub fn aggregates(&self) -> AggregateClient {
        AggregateClient::new(self.gateway.clone())
    }

    pub fn stores(&self) -> StoreClient {
        StoreClient::new(self.gateway.clone())
    }

    pub fn forgets(&self) -> ForgetClient {
        ForgetClient::new(self.gateway.clone())
    }

    pub fn programs(&self) -> ProgramClient {
        ProgramClient::new(self.gateway.clone())
    }

    pub fn instances(&self) -> InstanceClient {
        InstanceClient::new(self.gateway.clone())
    }

    pub fn messages(&self) -> MessageClient {
        MessageClient::new(self.gateway.clone())
    }
}

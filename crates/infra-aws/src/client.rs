// SSM Client Setup

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use ssm_env_core::port::{ParameterStore, ParameterStoreFactory, StoreError};
use std::sync::Arc;
use tracing::debug;

use crate::parameter_store::SsmParameterStore;

/// Builds an SSM client from the default AWS credential and region chain
#[derive(Debug, Default, Clone, Copy)]
pub struct SsmStoreFactory;

impl SsmStoreFactory {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ParameterStoreFactory for SsmStoreFactory {
    async fn connect(&self) -> Result<Arc<dyn ParameterStore>, StoreError> {
        let config = aws_config::defaults(BehaviorVersion::latest()).load().await;

        if config.region().is_none() {
            return Err(StoreError::Configuration(
                "no AWS region configured (set AWS_REGION or a profile region)".to_string(),
            ));
        }

        debug!(region = ?config.region(), "Created SSM client");

        Ok(Arc::new(SsmParameterStore::new(aws_sdk_ssm::Client::new(
            &config,
        ))))
    }
}

// SSM ParameterStore implementation

use async_trait::async_trait;
use aws_sdk_ssm::error::DisplayErrorContext;
use aws_sdk_ssm::types::Parameter as SsmParameter;
use ssm_env_core::domain::Parameter;
use ssm_env_core::port::{ParameterPage, ParameterStore, StoreError};
use tracing::debug;

/// AWS Systems Manager Parameter Store
#[derive(Debug, Clone)]
pub struct SsmParameterStore {
    client: aws_sdk_ssm::Client,
}

impl SsmParameterStore {
    pub fn new(client: aws_sdk_ssm::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ParameterStore for SsmParameterStore {
    async fn list_by_path(
        &self,
        path: &str,
        next_token: Option<String>,
    ) -> Result<ParameterPage, StoreError> {
        let output = self
            .client
            .get_parameters_by_path()
            .path(path)
            .recursive(true)
            .with_decryption(true)
            .set_next_token(next_token)
            .send()
            .await
            .map_err(|e| StoreError::Fetch {
                path: path.to_string(),
                message: DisplayErrorContext(&e).to_string(),
            })?;

        let parameters = output
            .parameters()
            .iter()
            .map(|p| to_parameter(path, p))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(path = %path, count = parameters.len(), "Fetched parameter page");

        Ok(ParameterPage {
            parameters,
            next_token: output.next_token().map(str::to_string),
        })
    }
}

/// Convert an SDK parameter, rejecting entries without a name or value
fn to_parameter(path: &str, parameter: &SsmParameter) -> Result<Parameter, StoreError> {
    let malformed = |message: &str| StoreError::Malformed {
        path: path.to_string(),
        message: message.to_string(),
    };

    let name = parameter.name().ok_or_else(|| malformed("missing name"))?;
    let value = parameter
        .value()
        .ok_or_else(|| malformed(&format!("missing value for {}", name)))?;

    Ok(Parameter::new(name, value))
}

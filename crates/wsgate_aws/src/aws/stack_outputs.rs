use std::collections::BTreeMap;

use async_trait::async_trait;
use aws_sdk_cloudformation::error::ProvideErrorMetadata;

use crate::adapters::stack_outputs::StackOutputs;
use crate::adapters::ProviderError;

/// [`StackOutputs`] backed by the CloudFormation client.
#[derive(Debug, Clone)]
pub struct CloudFormationOutputs {
    client: aws_sdk_cloudformation::Client,
}

impl CloudFormationOutputs {
    pub fn new(config: &aws_config::SdkConfig) -> Self {
        Self {
            client: aws_sdk_cloudformation::Client::new(config),
        }
    }
}

#[async_trait]
impl StackOutputs for CloudFormationOutputs {
    async fn fetch_outputs(
        &self,
        stack_name: &str,
    ) -> Result<BTreeMap<String, String>, ProviderError> {
        let response = self
            .client
            .describe_stacks()
            .stack_name(stack_name)
            .send()
            .await
            .map_err(|error| {
                let service_error = error.into_service_error();
                // A never-deployed stack surfaces as a generic validation
                // error, not a typed not-found variant.
                let message = service_error.message().unwrap_or_default().to_string();
                if message.contains("does not exist") {
                    ProviderError::NotFound
                } else {
                    ProviderError::Other(format!(
                        "failed to describe stack '{stack_name}': {service_error}"
                    ))
                }
            })?;

        let mut outputs = BTreeMap::new();
        for stack in response.stacks() {
            for output in stack.outputs() {
                if let (Some(key), Some(value)) = (output.output_key(), output.output_value()) {
                    outputs.insert(key.to_string(), value.to_string());
                }
            }
        }
        Ok(outputs)
    }
}

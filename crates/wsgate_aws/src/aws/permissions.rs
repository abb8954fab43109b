use async_trait::async_trait;

use crate::adapters::permissions::InvokePermissions;
use crate::adapters::ProviderError;

const INVOKE_ACTION: &str = "lambda:InvokeFunction";
const GATEWAY_PRINCIPAL: &str = "apigateway.amazonaws.com";

/// [`InvokePermissions`] backed by the Lambda client.
#[derive(Debug, Clone)]
pub struct LambdaPermissionClient {
    client: aws_sdk_lambda::Client,
}

impl LambdaPermissionClient {
    pub fn new(config: &aws_config::SdkConfig) -> Self {
        Self {
            client: aws_sdk_lambda::Client::new(config),
        }
    }
}

#[async_trait]
impl InvokePermissions for LambdaPermissionClient {
    async fn grant_invoke(
        &self,
        function_name: &str,
        statement_id: &str,
        source_arn: &str,
    ) -> Result<(), ProviderError> {
        self.client
            .add_permission()
            .function_name(function_name)
            .statement_id(statement_id)
            .action(INVOKE_ACTION)
            .principal(GATEWAY_PRINCIPAL)
            .source_arn(source_arn)
            .send()
            .await
            .map(|_| ())
            .map_err(|error| {
                let service_error = error.into_service_error();
                if service_error.is_resource_conflict_exception() {
                    ProviderError::AlreadyExists
                } else {
                    ProviderError::Other(format!(
                        "failed to grant invoke permission on '{function_name}': {service_error}"
                    ))
                }
            })
    }
}

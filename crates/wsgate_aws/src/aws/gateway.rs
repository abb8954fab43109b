use async_trait::async_trait;
use aws_sdk_apigatewayv2::types::{IntegrationType, ProtocolType};

use crate::adapters::gateway::GatewayApi;
use crate::adapters::{GatewaySummary, ProviderError};

/// [`GatewayApi`] backed by the API Gateway v2 management client.
#[derive(Debug, Clone)]
pub struct ApiGatewayManagementClient {
    client: aws_sdk_apigatewayv2::Client,
}

impl ApiGatewayManagementClient {
    pub fn new(config: &aws_config::SdkConfig) -> Self {
        Self {
            client: aws_sdk_apigatewayv2::Client::new(config),
        }
    }
}

#[async_trait]
impl GatewayApi for ApiGatewayManagementClient {
    async fn list_gateways(&self) -> Result<Vec<GatewaySummary>, ProviderError> {
        let mut gateways = Vec::new();
        let mut next_token: Option<String> = None;
        loop {
            let response = self
                .client
                .get_apis()
                .set_next_token(next_token)
                .send()
                .await
                .map_err(|error| {
                    ProviderError::Other(format!("failed to list gateways: {error}"))
                })?;

            for api in response.items() {
                if let (Some(api_id), Some(name)) = (api.api_id(), api.name()) {
                    gateways.push(GatewaySummary {
                        api_id: api_id.to_string(),
                        name: name.to_string(),
                    });
                }
            }

            next_token = response.next_token().map(str::to_string);
            if next_token.is_none() {
                break;
            }
        }
        Ok(gateways)
    }

    async fn create_gateway(
        &self,
        name: &str,
        route_selection_expression: &str,
    ) -> Result<String, ProviderError> {
        let response = self
            .client
            .create_api()
            .name(name)
            .protocol_type(ProtocolType::Websocket)
            .route_selection_expression(route_selection_expression)
            .send()
            .await
            .map_err(|error| {
                ProviderError::Other(format!("failed to create gateway '{name}': {error}"))
            })?;

        response
            .api_id()
            .map(str::to_string)
            .ok_or_else(|| ProviderError::Other("create-api response carried no id".to_string()))
    }

    async fn create_integration(
        &self,
        api_id: &str,
        integration_uri: &str,
    ) -> Result<String, ProviderError> {
        let response = self
            .client
            .create_integration()
            .api_id(api_id)
            .integration_type(IntegrationType::AwsProxy)
            .integration_method("POST")
            .integration_uri(integration_uri)
            .send()
            .await
            .map_err(|error| {
                ProviderError::Other(format!("failed to create integration: {error}"))
            })?;

        response.integration_id().map(str::to_string).ok_or_else(|| {
            ProviderError::Other("create-integration response carried no id".to_string())
        })
    }

    async fn create_route(
        &self,
        api_id: &str,
        route_key: &str,
        target: &str,
    ) -> Result<(), ProviderError> {
        self.client
            .create_route()
            .api_id(api_id)
            .route_key(route_key)
            .target(target)
            .send()
            .await
            .map(|_| ())
            .map_err(|error| {
                let service_error = error.into_service_error();
                if service_error.is_conflict_exception() {
                    ProviderError::AlreadyExists
                } else {
                    ProviderError::Other(format!(
                        "failed to create route '{route_key}': {service_error}"
                    ))
                }
            })
    }

    async fn create_deployment(&self, api_id: &str) -> Result<String, ProviderError> {
        let response = self
            .client
            .create_deployment()
            .api_id(api_id)
            .send()
            .await
            .map_err(|error| {
                ProviderError::Other(format!("failed to create deployment: {error}"))
            })?;

        response.deployment_id().map(str::to_string).ok_or_else(|| {
            ProviderError::Other("create-deployment response carried no id".to_string())
        })
    }

    async fn update_stage(
        &self,
        api_id: &str,
        stage: &str,
        deployment_id: &str,
    ) -> Result<(), ProviderError> {
        self.client
            .update_stage()
            .api_id(api_id)
            .stage_name(stage)
            .deployment_id(deployment_id)
            .send()
            .await
            .map(|_| ())
            .map_err(|error| {
                let service_error = error.into_service_error();
                if service_error.is_not_found_exception() {
                    ProviderError::NotFound
                } else {
                    ProviderError::Other(format!(
                        "failed to update stage '{stage}': {service_error}"
                    ))
                }
            })
    }

    async fn create_stage(
        &self,
        api_id: &str,
        stage: &str,
        deployment_id: &str,
    ) -> Result<(), ProviderError> {
        self.client
            .create_stage()
            .api_id(api_id)
            .stage_name(stage)
            .deployment_id(deployment_id)
            .send()
            .await
            .map(|_| ())
            .map_err(|error| {
                let service_error = error.into_service_error();
                if service_error.is_conflict_exception() {
                    ProviderError::AlreadyExists
                } else {
                    ProviderError::Other(format!(
                        "failed to create stage '{stage}': {service_error}"
                    ))
                }
            })
    }

    async fn delete_gateway(&self, api_id: &str) -> Result<(), ProviderError> {
        self.client
            .delete_api()
            .api_id(api_id)
            .send()
            .await
            .map(|_| ())
            .map_err(|error| {
                let service_error = error.into_service_error();
                if service_error.is_not_found_exception() {
                    ProviderError::NotFound
                } else {
                    ProviderError::Other(format!(
                        "failed to delete gateway '{api_id}': {service_error}"
                    ))
                }
            })
    }
}

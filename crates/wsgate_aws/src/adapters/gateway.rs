use async_trait::async_trait;

use super::{GatewaySummary, ProviderError};

/// Management surface of the websocket gateway service.
///
/// Implementations are expected to page through listing results
/// internally and to classify conflict/not-found service errors into
/// [`ProviderError`] variants.
#[async_trait]
pub trait GatewayApi: Send + Sync {
    async fn list_gateways(&self) -> Result<Vec<GatewaySummary>, ProviderError>;

    /// Creates a websocket-protocol gateway and returns its id.
    async fn create_gateway(
        &self,
        name: &str,
        route_selection_expression: &str,
    ) -> Result<String, ProviderError>;

    /// Creates a proxy integration and returns its id. The provider
    /// deduplicates identical integrations; no pre-check is performed.
    async fn create_integration(
        &self,
        api_id: &str,
        integration_uri: &str,
    ) -> Result<String, ProviderError>;

    async fn create_route(
        &self,
        api_id: &str,
        route_key: &str,
        target: &str,
    ) -> Result<(), ProviderError>;

    /// Publishes a deployment snapshot and returns its id.
    async fn create_deployment(&self, api_id: &str) -> Result<String, ProviderError>;

    async fn update_stage(
        &self,
        api_id: &str,
        stage: &str,
        deployment_id: &str,
    ) -> Result<(), ProviderError>;

    async fn create_stage(
        &self,
        api_id: &str,
        stage: &str,
        deployment_id: &str,
    ) -> Result<(), ProviderError>;

    async fn delete_gateway(&self, api_id: &str) -> Result<(), ProviderError>;
}

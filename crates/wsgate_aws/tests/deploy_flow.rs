//! End-to-end deploy flow against an in-memory provider.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use wsgate_aws::adapters::gateway::GatewayApi;
use wsgate_aws::adapters::permissions::InvokePermissions;
use wsgate_aws::adapters::stack_outputs::StackOutputs;
use wsgate_aws::adapters::{GatewaySummary, ProviderError};
use wsgate_aws::lifecycle::WebsocketGatewayManager;
use wsgate_core::manifest::ServiceManifest;

/// Remembers every resource it is asked to create, like the real
/// provider would.
#[derive(Default)]
struct InMemoryProvider {
    gateways: Mutex<Vec<GatewaySummary>>,
    integrations: Mutex<Vec<String>>,
    permissions: Mutex<Vec<String>>,
    routes: Mutex<Vec<(String, String)>>,
    deployments: Mutex<Vec<String>>,
    stages: Mutex<Vec<String>>,
}

#[async_trait]
impl GatewayApi for InMemoryProvider {
    async fn list_gateways(&self) -> Result<Vec<GatewaySummary>, ProviderError> {
        Ok(self.gateways.lock().expect("poisoned mutex").clone())
    }

    async fn create_gateway(
        &self,
        name: &str,
        _route_selection_expression: &str,
    ) -> Result<String, ProviderError> {
        let mut gateways = self.gateways.lock().expect("poisoned mutex");
        let api_id = format!("api-{}", gateways.len() + 1);
        gateways.push(GatewaySummary {
            api_id: api_id.clone(),
            name: name.to_string(),
        });
        Ok(api_id)
    }

    async fn create_integration(
        &self,
        _api_id: &str,
        integration_uri: &str,
    ) -> Result<String, ProviderError> {
        let mut integrations = self.integrations.lock().expect("poisoned mutex");
        integrations.push(integration_uri.to_string());
        Ok(format!("int-{}", integrations.len()))
    }

    async fn create_route(
        &self,
        _api_id: &str,
        route_key: &str,
        target: &str,
    ) -> Result<(), ProviderError> {
        let mut routes = self.routes.lock().expect("poisoned mutex");
        // The provider conflicts on the route key alone, whatever the
        // target points at.
        if routes.iter().any(|(existing, _)| existing == route_key) {
            return Err(ProviderError::AlreadyExists);
        }
        routes.push((route_key.to_string(), target.to_string()));
        Ok(())
    }

    async fn create_deployment(&self, _api_id: &str) -> Result<String, ProviderError> {
        let mut deployments = self.deployments.lock().expect("poisoned mutex");
        let deployment_id = format!("dep-{}", deployments.len() + 1);
        deployments.push(deployment_id.clone());
        Ok(deployment_id)
    }

    async fn update_stage(
        &self,
        _api_id: &str,
        stage: &str,
        _deployment_id: &str,
    ) -> Result<(), ProviderError> {
        let stages = self.stages.lock().expect("poisoned mutex");
        if stages.iter().any(|existing| existing == stage) {
            Ok(())
        } else {
            Err(ProviderError::NotFound)
        }
    }

    async fn create_stage(
        &self,
        _api_id: &str,
        stage: &str,
        _deployment_id: &str,
    ) -> Result<(), ProviderError> {
        let mut stages = self.stages.lock().expect("poisoned mutex");
        if stages.iter().any(|existing| existing == stage) {
            return Err(ProviderError::AlreadyExists);
        }
        stages.push(stage.to_string());
        Ok(())
    }

    async fn delete_gateway(&self, api_id: &str) -> Result<(), ProviderError> {
        let mut gateways = self.gateways.lock().expect("poisoned mutex");
        gateways.retain(|gateway| gateway.api_id != api_id);
        Ok(())
    }
}

#[async_trait]
impl InvokePermissions for InMemoryProvider {
    async fn grant_invoke(
        &self,
        _function_name: &str,
        statement_id: &str,
        _source_arn: &str,
    ) -> Result<(), ProviderError> {
        let mut permissions = self.permissions.lock().expect("poisoned mutex");
        if permissions.iter().any(|existing| existing == statement_id) {
            return Err(ProviderError::AlreadyExists);
        }
        permissions.push(statement_id.to_string());
        Ok(())
    }
}

#[async_trait]
impl StackOutputs for InMemoryProvider {
    async fn fetch_outputs(
        &self,
        stack_name: &str,
    ) -> Result<BTreeMap<String, String>, ProviderError> {
        if stack_name != "chat-dev" {
            return Err(ProviderError::NotFound);
        }
        Ok(BTreeMap::from([(
            "OnMessageLambdaFunctionQualifiedArn".to_string(),
            "arn:aws:lambda:us-east-1:111122223333:function:chat-dev-onMessage:3".to_string(),
        )]))
    }
}

const CHAT_MANIFEST: &str = r#"
service: chat
provider:
  stage: dev
  region: us-east-1
functions:
  onMessage:
    events:
      - websocket:
          route: default
"#;

fn manager(provider: Arc<InMemoryProvider>) -> WebsocketGatewayManager {
    let manifest = ServiceManifest::from_yaml(CHAT_MANIFEST).expect("manifest should parse");
    WebsocketGatewayManager::new(manifest, provider.clone(), provider.clone(), provider)
}

#[tokio::test]
async fn deploy_provisions_the_chat_service_exactly_once() {
    let provider = Arc::new(InMemoryProvider::default());

    let endpoint = manager(provider.clone())
        .deploy()
        .await
        .expect("deploy should succeed");

    assert_eq!(
        endpoint,
        "wss://api-1.execute-api.us-east-1.amazonaws.com/dev/"
    );

    let gateways = provider.gateways.lock().expect("poisoned mutex").clone();
    assert_eq!(gateways.len(), 1);
    assert_eq!(gateways[0].name, "chat-dev-websockets-api");

    assert_eq!(
        provider.integrations.lock().expect("poisoned mutex").len(),
        1
    );
    assert_eq!(
        provider.permissions.lock().expect("poisoned mutex").clone(),
        vec!["chat-dev-websockets-api-onMessage".to_string()]
    );
    assert_eq!(
        provider.routes.lock().expect("poisoned mutex").clone(),
        vec![("default".to_string(), "integrations/int-1".to_string())]
    );
    assert_eq!(provider.deployments.lock().expect("poisoned mutex").len(), 1);
    assert_eq!(
        provider.stages.lock().expect("poisoned mutex").clone(),
        vec!["dev".to_string()]
    );
}

#[tokio::test]
async fn second_deploy_is_absorbed_by_conflict_handling() {
    let provider = Arc::new(InMemoryProvider::default());

    manager(provider.clone())
        .deploy()
        .await
        .expect("first deploy should succeed");
    manager(provider.clone())
        .deploy()
        .await
        .expect("second deploy should also succeed");

    // Still exactly one gateway, permission, route, and stage; only the
    // deployment snapshot accumulates.
    assert_eq!(provider.gateways.lock().expect("poisoned mutex").len(), 1);
    assert_eq!(
        provider.permissions.lock().expect("poisoned mutex").len(),
        1
    );
    assert_eq!(provider.routes.lock().expect("poisoned mutex").len(), 1);
    assert_eq!(provider.stages.lock().expect("poisoned mutex").len(), 1);
    assert_eq!(
        provider.deployments.lock().expect("poisoned mutex").len(),
        2
    );
}

#[tokio::test]
async fn remove_after_deploy_leaves_no_gateway_behind() {
    let provider = Arc::new(InMemoryProvider::default());

    manager(provider.clone())
        .deploy()
        .await
        .expect("deploy should succeed");
    manager(provider.clone())
        .remove()
        .await
        .expect("remove should succeed");

    assert!(provider.gateways.lock().expect("poisoned mutex").is_empty());
}

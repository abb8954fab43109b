//! Lifecycle orchestration for the websocket gateway.
//!
//! [`WebsocketGatewayManager`] sequences the provider calls behind the
//! three lifecycle hooks (`deploy`, `remove`, `info`). It holds no
//! durable state: the gateway id is re-resolved on every invocation and
//! the remote provider's resources are the only oracle.

use std::sync::Arc;

use futures_util::future;
use thiserror::Error;
use tracing::{debug, info};

use wsgate_core::bindings::{collect_function_bindings, FunctionBinding};
use wsgate_core::error::CoreError;
use wsgate_core::manifest::ServiceManifest;
use wsgate_core::naming;

use crate::adapters::gateway::GatewayApi;
use crate::adapters::permissions::InvokePermissions;
use crate::adapters::stack_outputs::StackOutputs;
use crate::adapters::ProviderError;

/// Failure of a lifecycle operation. There is no retry and no rollback:
/// re-running `deploy` is the recovery path, relying on each create
/// call's idempotent/overwrite behavior.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("provider call failed: {0}")]
    Provider(#[from] ProviderError),
}

pub struct WebsocketGatewayManager {
    manifest: ServiceManifest,
    gateway_name: String,
    route_selection_expression: String,
    stage: String,
    region: String,
    stack_name: String,
    gateway: Arc<dyn GatewayApi>,
    permissions: Arc<dyn InvokePermissions>,
    stack_outputs: Arc<dyn StackOutputs>,
}

impl WebsocketGatewayManager {
    /// Computes the gateway identity once from static configuration and
    /// wires in the three provider surfaces.
    pub fn new(
        manifest: ServiceManifest,
        gateway: Arc<dyn GatewayApi>,
        permissions: Arc<dyn InvokePermissions>,
        stack_outputs: Arc<dyn StackOutputs>,
    ) -> Self {
        let gateway_name = naming::gateway_name(&manifest);
        let route_selection_expression = naming::route_selection_expression(&manifest);
        let stage = manifest.provider.stage.clone();
        let region = manifest.provider.region.clone();
        let stack_name = naming::stack_name(&manifest.service, &stage);
        Self {
            manifest,
            gateway_name,
            route_selection_expression,
            stage,
            region,
            stack_name,
            gateway,
            permissions,
            stack_outputs,
        }
    }

    pub fn gateway_name(&self) -> &str {
        &self.gateway_name
    }

    /// Full provisioning pass: collect bindings, ensure the gateway,
    /// wire every function, publish a stage-bound deployment. Returns
    /// the resolved endpoint.
    pub async fn deploy(&self) -> Result<String, LifecycleError> {
        info!(gateway = %self.gateway_name, "deploying websocket gateway");

        let bindings = self.collect_bindings().await?;
        let api_id = self.ensure_gateway().await?;
        self.wire_all_routes(&api_id, &bindings).await?;
        self.publish_deployment(&api_id).await?;

        let endpoint = naming::websocket_endpoint(&api_id, &self.region, &self.stage);
        info!(
            gateway = %self.gateway_name,
            api_id = %api_id,
            endpoint = %endpoint,
            "websocket gateway deployed"
        );
        Ok(endpoint)
    }

    /// Deletes the gateway when it exists; otherwise a no-op.
    pub async fn remove(&self) -> Result<(), LifecycleError> {
        match self.resolve_existing_gateway().await? {
            Some(api_id) => {
                info!(gateway = %self.gateway_name, api_id = %api_id, "removing websocket gateway");
                self.gateway.delete_gateway(&api_id).await?;
                Ok(())
            }
            None => {
                debug!(gateway = %self.gateway_name, "no websocket gateway to remove");
                Ok(())
            }
        }
    }

    /// Renders the operator-facing summary block, or `None` when there
    /// is nothing to report (no websocket functions, or the gateway was
    /// never deployed).
    pub async fn info(&self) -> Result<Option<String>, LifecycleError> {
        let bindings = self.collect_bindings().await?;
        if bindings.is_empty() {
            return Ok(None);
        }
        let Some(api_id) = self.resolve_existing_gateway().await? else {
            info!(gateway = %self.gateway_name, "websocket gateway is not deployed");
            return Ok(None);
        };
        let endpoint = naming::websocket_endpoint(&api_id, &self.region, &self.stage);
        Ok(Some(render_info(&endpoint, &bindings)))
    }

    /// Lists the provider's gateways and matches on the computed name.
    async fn resolve_existing_gateway(&self) -> Result<Option<String>, LifecycleError> {
        let gateways = self.gateway.list_gateways().await?;
        Ok(gateways
            .into_iter()
            .find(|gateway| gateway.name == self.gateway_name)
            .map(|gateway| gateway.api_id))
    }

    /// Reuses the existing gateway or creates one. Idempotent by
    /// construction but not transactional: two concurrent deploys can
    /// both observe "absent" and race the create. Single-operator deploy
    /// pipelines are the intended caller.
    async fn ensure_gateway(&self) -> Result<String, LifecycleError> {
        if let Some(api_id) = self.resolve_existing_gateway().await? {
            debug!(gateway = %self.gateway_name, api_id = %api_id, "reusing existing gateway");
            return Ok(api_id);
        }
        let api_id = self
            .gateway
            .create_gateway(&self.gateway_name, &self.route_selection_expression)
            .await?;
        debug!(gateway = %self.gateway_name, api_id = %api_id, "created gateway");
        Ok(api_id)
    }

    /// Cross-references declared functions against the deployed stack's
    /// outputs. Skips the stack query entirely when no functions are
    /// declared.
    async fn collect_bindings(&self) -> Result<Vec<FunctionBinding>, LifecycleError> {
        if self.manifest.functions.is_empty() {
            return Ok(Vec::new());
        }
        let outputs = self.stack_outputs.fetch_outputs(&self.stack_name).await?;
        Ok(collect_function_bindings(&self.manifest, &outputs)?)
    }

    /// Wires every function binding. All per-function futures are
    /// started before any is awaited; within one function the
    /// integration strictly precedes its permission grant and routes,
    /// across functions there is no ordering guarantee.
    async fn wire_all_routes(
        &self,
        api_id: &str,
        bindings: &[FunctionBinding],
    ) -> Result<(), LifecycleError> {
        let tasks: Vec<_> = bindings
            .iter()
            .map(|binding| self.wire_function(api_id, binding))
            .collect();
        future::try_join_all(tasks).await?;
        Ok(())
    }

    async fn wire_function(
        &self,
        api_id: &str,
        binding: &FunctionBinding,
    ) -> Result<(), LifecycleError> {
        let arn = &binding.function_arn;
        let integration_uri =
            naming::integration_uri(arn.partition(), &self.region, &arn.to_string());
        let integration_id = self
            .gateway
            .create_integration(api_id, &integration_uri)
            .await?;

        let statement_id =
            naming::permission_statement_id(&self.gateway_name, &binding.function_name);
        let source_arn = arn.execute_api_source_arn(api_id);
        match self
            .permissions
            .grant_invoke(arn.function_name(), &statement_id, &source_arn)
            .await
        {
            Ok(()) => {}
            Err(ProviderError::AlreadyExists) => {
                debug!(function = %binding.function_name, "invoke permission already granted");
            }
            Err(error) => return Err(error.into()),
        }

        let target = naming::route_target(&integration_id);
        for route_key in &binding.routes {
            match self.gateway.create_route(api_id, route_key, &target).await {
                Ok(()) => {
                    debug!(function = %binding.function_name, route = %route_key, "route created");
                }
                Err(ProviderError::AlreadyExists) => {
                    debug!(function = %binding.function_name, route = %route_key, "route already bound");
                }
                Err(error) => return Err(error.into()),
            }
        }
        Ok(())
    }

    /// Publishes a deployment and binds it to the stage, creating the
    /// stage when it does not exist yet. The only two-path decision
    /// point in the lifecycle.
    async fn publish_deployment(&self, api_id: &str) -> Result<(), LifecycleError> {
        let deployment_id = self.gateway.create_deployment(api_id).await?;
        match self
            .gateway
            .update_stage(api_id, &self.stage, &deployment_id)
            .await
        {
            Ok(()) => Ok(()),
            Err(ProviderError::NotFound) => {
                debug!(stage = %self.stage, "stage missing; creating it");
                match self
                    .gateway
                    .create_stage(api_id, &self.stage, &deployment_id)
                    .await
                {
                    Ok(()) | Err(ProviderError::AlreadyExists) => Ok(()),
                    Err(error) => Err(error.into()),
                }
            }
            Err(error) => Err(error.into()),
        }
    }
}

/// Operator-facing summary block printed by the info hook.
pub fn render_info(endpoint: &str, bindings: &[FunctionBinding]) -> String {
    let mut block = String::from("WebSockets:\n");
    block.push_str(&format!("  {endpoint}\n"));
    block.push_str("  Routes:\n");
    for binding in bindings {
        for route in &binding.routes {
            block.push_str(&format!("    {endpoint}{route}\n"));
        }
    }
    block
}

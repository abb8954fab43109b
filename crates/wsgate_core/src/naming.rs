//! Identifier templating for every name this tool derives.
//!
//! One pure function per identifier so each template is testable as an
//! exact string.

use crate::manifest::ServiceManifest;

pub const DEFAULT_ROUTE_SELECTION_EXPRESSION: &str = "$request.body.action";

/// Gateway name: user override when configured, else
/// `{service}-{stage}-websockets-api`.
pub fn gateway_name(manifest: &ServiceManifest) -> String {
    manifest
        .websocket
        .as_ref()
        .and_then(|websocket| websocket.name.clone())
        .unwrap_or_else(|| {
            format!(
                "{}-{}-websockets-api",
                manifest.service, manifest.provider.stage
            )
        })
}

/// Route selection expression: user override when configured, else the
/// provider default.
pub fn route_selection_expression(manifest: &ServiceManifest) -> String {
    manifest
        .websocket
        .as_ref()
        .and_then(|websocket| websocket.route_selection_expression.clone())
        .unwrap_or_else(|| DEFAULT_ROUTE_SELECTION_EXPRESSION.to_string())
}

/// CloudFormation stack the host pipeline deployed the service into.
pub fn stack_name(service: &str, stage: &str) -> String {
    format!("{service}-{stage}")
}

/// Output key under which the host pipeline publishes a function's
/// qualified ARN: upper-first function name + `LambdaFunctionQualifiedArn`.
pub fn function_output_key(function_name: &str) -> String {
    let mut characters = function_name.chars();
    match characters.next() {
        Some(first) => format!(
            "{}{}LambdaFunctionQualifiedArn",
            first.to_uppercase(),
            characters.as_str()
        ),
        None => "LambdaFunctionQualifiedArn".to_string(),
    }
}

/// Proxy integration URI invoking the given function through the gateway's
/// regional apigateway service endpoint.
pub fn integration_uri(partition: &str, region: &str, function_arn: &str) -> String {
    format!(
        "arn:{partition}:apigateway:{region}:lambda:path/2015-03-31/functions/{function_arn}/invocations"
    )
}

/// Route target referencing an integration created on the same gateway.
pub fn route_target(integration_id: &str) -> String {
    format!("integrations/{integration_id}")
}

/// Statement id for a function's invoke grant. Deterministic across
/// re-deploys so repeats land on the provider's conflict path instead of
/// accumulating statements.
pub fn permission_statement_id(gateway_name: &str, function_name: &str) -> String {
    format!("{gateway_name}-{function_name}")
}

/// Public endpoint of a deployed stage.
pub fn websocket_endpoint(api_id: &str, region: &str, stage: &str) -> String {
    format!("wss://{api_id}.execute-api.{region}.amazonaws.com/{stage}/")
}

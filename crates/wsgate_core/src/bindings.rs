use std::collections::BTreeMap;

use crate::arn::LambdaArn;
use crate::error::CoreError;
use crate::manifest::ServiceManifest;
use crate::naming::function_output_key;

/// A declared function cross-referenced against the deployed stack's
/// outputs. Built fresh for each lifecycle call and discarded afterwards;
/// the remote provider is the only durable state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionBinding {
    pub function_name: String,
    pub function_arn: LambdaArn,
    pub routes: Vec<String>,
}

/// Resolves every declared function with at least one websocket event
/// against the stack output map.
///
/// A function whose output key is absent was never deployed; that is a
/// hard precondition failure, not a retryable condition.
pub fn collect_function_bindings(
    manifest: &ServiceManifest,
    outputs: &BTreeMap<String, String>,
) -> Result<Vec<FunctionBinding>, CoreError> {
    let mut bindings = Vec::new();
    for (function_name, spec) in &manifest.functions {
        let routes = spec.websocket_routes();
        if routes.is_empty() {
            continue;
        }

        let key = function_output_key(function_name);
        let arn_value = outputs
            .get(&key)
            .ok_or_else(|| CoreError::MissingStackOutput {
                function: function_name.clone(),
                key: key.clone(),
            })?;
        let function_arn: LambdaArn = arn_value.parse()?;

        bindings.push(FunctionBinding {
            function_name: function_name.clone(),
            function_arn,
            routes,
        });
    }
    Ok(bindings)
}

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Static service configuration consumed once at construction.
///
/// Mirrors the section of the host deployment manifest this tool cares
/// about: the service identity, the target stage/region, optional gateway
/// overrides, and per-function websocket event declarations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceManifest {
    pub service: String,
    pub provider: ProviderSettings,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub websocket: Option<WebsocketSettings>,
    #[serde(default)]
    pub functions: BTreeMap<String, FunctionSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProviderSettings {
    pub stage: String,
    pub region: String,
}

/// Optional gateway overrides. Absence is represented by the option being
/// unset, never by probing the value's runtime type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WebsocketSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route_selection_expression: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FunctionSpec {
    #[serde(default, with = "serde_yaml::with::singleton_map_recursive")]
    pub events: Vec<EventSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum EventSpec {
    Websocket(WebsocketEvent),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WebsocketEvent {
    pub route: String,
}

impl FunctionSpec {
    /// Route keys declared on this function's websocket events, in
    /// declaration order. Empty when the function handles no websocket
    /// traffic.
    pub fn websocket_routes(&self) -> Vec<String> {
        self.events
            .iter()
            .map(|event| {
                let EventSpec::Websocket(websocket) = event;
                websocket.route.clone()
            })
            .collect()
    }
}

impl ServiceManifest {
    /// Parses and validates a manifest from YAML text.
    pub fn from_yaml(text: &str) -> Result<Self, CoreError> {
        let manifest: Self = serde_yaml::from_str(text)
            .map_err(|error| CoreError::Manifest(format!("malformed manifest: {error}")))?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Reads, parses, and validates a manifest file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|error| {
            CoreError::Manifest(format!("failed to read '{}': {error}", path.display()))
        })?;
        Self::from_yaml(&text)
    }

    /// Rejects manifests that would template broken identifiers downstream.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.service.trim().is_empty() {
            return Err(CoreError::Manifest("service cannot be empty".to_string()));
        }
        if self.provider.stage.trim().is_empty() {
            return Err(CoreError::Manifest("provider.stage cannot be empty".to_string()));
        }
        if self.provider.region.trim().is_empty() {
            return Err(CoreError::Manifest("provider.region cannot be empty".to_string()));
        }

        if let Some(websocket) = &self.websocket {
            if let Some(name) = &websocket.name {
                if name.trim().is_empty() {
                    return Err(CoreError::Manifest(
                        "websocket.name override cannot be empty".to_string(),
                    ));
                }
            }
            if let Some(expression) = &websocket.route_selection_expression {
                if expression.trim().is_empty() {
                    return Err(CoreError::Manifest(
                        "websocket.route_selection_expression override cannot be empty".to_string(),
                    ));
                }
            }
        }

        for (function_name, spec) in &self.functions {
            if function_name.trim().is_empty() {
                return Err(CoreError::Manifest(
                    "function names must be non-empty strings".to_string(),
                ));
            }
            for route in spec.websocket_routes() {
                if route.trim().is_empty() {
                    return Err(CoreError::Manifest(format!(
                        "function '{function_name}' declares a websocket event with an empty route"
                    )));
                }
            }
        }

        Ok(())
    }
}

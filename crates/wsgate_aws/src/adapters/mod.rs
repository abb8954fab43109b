//! Call-wrapper traits over the provider's control plane.
//!
//! Every call returns a typed outcome so the lifecycle manager's
//! conflict handling is testable without a live provider.

pub mod gateway;
pub mod permissions;
pub mod stack_outputs;

use thiserror::Error;

/// Classified outcome of a failed provider call.
///
/// `AlreadyExists` and `NotFound` are the only conditions the lifecycle
/// logic reacts to; everything else propagates unchanged and aborts the
/// running operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("resource already exists")]
    AlreadyExists,
    #[error("resource not found")]
    NotFound,
    #[error("{0}")]
    Other(String),
}

/// One gateway as reported by the provider's listing call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewaySummary {
    pub api_id: String,
    pub name: String,
}

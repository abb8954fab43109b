//! AWS-oriented adapters and lifecycle orchestration for the websocket
//! gateway tool.
//!
//! This crate owns provider integration details (API Gateway v2, Lambda
//! permissions, CloudFormation outputs) behind call-wrapper traits, and
//! the lifecycle manager that sequences them. Deterministic naming and
//! contract primitives live in `wsgate_core`.

pub mod adapters;
pub mod aws;
pub mod lifecycle;

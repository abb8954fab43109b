use thiserror::Error;

/// Failures raised by manifest handling and binding collection.
///
/// Every variant is a precondition failure for the calling lifecycle
/// operation; none of them is retryable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("invalid manifest: {0}")]
    Manifest(String),

    #[error("malformed lambda ARN '{arn}': {reason}")]
    MalformedArn { arn: String, reason: String },

    #[error(
        "function '{function}' has no '{key}' output in the deployed stack; \
         deploy the service before wiring websocket routes"
    )]
    MissingStackOutput { function: String, key: String },
}

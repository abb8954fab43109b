use async_trait::async_trait;

use super::ProviderError;

/// Invoke-permission surface of the compute service.
#[async_trait]
pub trait InvokePermissions: Send + Sync {
    /// Grants the gateway service principal permission to invoke the
    /// function, scoped by the given source ARN. An existing identical
    /// grant surfaces as [`ProviderError::AlreadyExists`].
    async fn grant_invoke(
        &self,
        function_name: &str,
        statement_id: &str,
        source_arn: &str,
    ) -> Result<(), ProviderError>;
}

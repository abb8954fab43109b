use std::collections::BTreeMap;

use async_trait::async_trait;

use super::ProviderError;

/// Query surface for the host pipeline's deployed stack outputs.
#[async_trait]
pub trait StackOutputs: Send + Sync {
    /// Returns the stack's output key/value map. A stack that was never
    /// deployed surfaces as [`ProviderError::NotFound`].
    async fn fetch_outputs(&self, stack_name: &str)
        -> Result<BTreeMap<String, String>, ProviderError>;
}

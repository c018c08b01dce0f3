use crate::{
    error::Result,
    models::{ChatMessage, GenerationOptions, ModelDescriptor, ProviderDescriptor},
};
use async_trait::async_trait;

/// One vendor's REST API behind a uniform contract.
///
/// Implementations hold no mutable state beyond their HTTP client, so a
/// single instance may serve concurrent calls.
#[async_trait]
pub trait ProviderClient: Send + Sync {
    fn descriptor(&self) -> &ProviderDescriptor;

    /// Model used when the caller has not picked one.
    fn default_model(&self) -> &str;

    /// Never fails: catalog errors degrade to a built-in list.
    async fn list_models(&self, api_key: Option<&str>) -> Vec<ModelDescriptor>;

    /// Issues exactly one request. An empty `api_key` fails with
    /// `MissingCredential` before anything goes over the wire.
    async fn generate_content(
        &self,
        api_key: &str,
        model: &str,
        messages: &[ChatMessage],
        options: Option<&GenerationOptions>,
    ) -> Result<String>;
}

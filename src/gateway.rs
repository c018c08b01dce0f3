use crate::{
    config::{GatewayConfig, ProviderConfig},
    error::{ProviderError, Result},
    logger,
    models::{ChatMessage, ModelDescriptor, ProviderDescriptor},
    prompts::{LearningMode, SYSTEM_PROMPT},
    registry::ProviderRegistry,
};
use uuid::Uuid;

/// Single entry point turning (topic, mode) into study material.
pub struct LearningGateway {
    registry: ProviderRegistry,
}

impl Default for LearningGateway {
    fn default() -> Self {
        Self::new(ProviderRegistry::default())
    }
}

impl LearningGateway {
    pub fn new(registry: ProviderRegistry) -> Self {
        Self { registry }
    }

    pub fn from_config(config: &ProviderConfig) -> Self {
        Self::new(ProviderRegistry::new(config))
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    pub fn providers(&self) -> Vec<ProviderDescriptor> {
        self.registry.descriptors()
    }

    /// Fixed tutor system message followed by the rendered template.
    pub fn build_messages(topic: &str, mode: LearningMode) -> Vec<ChatMessage> {
        vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(mode.render(topic)),
        ]
    }

    /// Returns the provider's text untouched. Flashcard and quiz output is
    /// not parsed here.
    pub async fn generate_learning_content(
        &self,
        config: &GatewayConfig,
        topic: &str,
        mode: LearningMode,
    ) -> Result<String> {
        let client = self.registry.resolve(&config.provider_id)?;
        let descriptor = client.descriptor();

        let api_key = config
            .api_key()
            .ok_or_else(|| ProviderError::missing_credential(descriptor.display_name.clone()))?;
        let model = config
            .model_id
            .as_deref()
            .unwrap_or_else(|| client.default_model());

        let messages = Self::build_messages(topic, mode);
        let request_id = Uuid::new_v4();

        log::info!(
            "📚 [req:{}] Generating {} for '{}' via {} ({})",
            request_id,
            mode,
            topic,
            descriptor.display_name,
            model
        );
        log::debug!("[req:{}] API key length: {}", request_id, api_key.len());

        let _timer = logger::timer(&format!("{} {}", descriptor.id, mode));
        let content = client
            .generate_content(api_key, model, &messages, Some(&config.options))
            .await
            .map_err(|e| {
                log::error!("❌ [req:{}] Generation failed: {}", request_id, e);
                e
            })?;

        log::info!(
            "✅ [req:{}] Received {} characters",
            request_id,
            content.chars().count()
        );
        Ok(content)
    }

    /// Models for the configured provider; falls back to the built-in list
    /// when the catalog cannot be fetched.
    pub async fn list_models(&self, config: &GatewayConfig) -> Result<Vec<ModelDescriptor>> {
        let client = self.registry.resolve(&config.provider_id)?;
        Ok(client.list_models(config.api_key()).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_messages() {
        let messages = LearningGateway::build_messages("Photosynthesis", LearningMode::Quiz);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0], ChatMessage::system(SYSTEM_PROMPT));
        assert!(messages[1].content.contains("Photosynthesis"));
    }

    #[tokio::test]
    async fn test_missing_key_reports_provider_name() {
        let gateway = LearningGateway::default();
        let config = GatewayConfig::new().with_provider("anthropic");

        let err = gateway
            .generate_learning_content(&config, "Entropy", LearningMode::Explain)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Anthropic API key is required");
    }

    #[tokio::test]
    async fn test_unknown_provider_checked_before_key() {
        let gateway = LearningGateway::default();
        let config = GatewayConfig::new().with_provider("mistral");

        let err = gateway
            .generate_learning_content(&config, "Entropy", LearningMode::Explain)
            .await
            .unwrap_err();

        assert!(matches!(err, ProviderError::UnknownProvider(_)));
    }

    #[tokio::test]
    async fn test_static_listing_needs_no_key() {
        let gateway = LearningGateway::default();
        let config = GatewayConfig::new().with_provider("anthropic");
        let models = gateway.list_models(&config).await.unwrap();
        assert!(!models.is_empty());
        assert!(models.iter().all(|m| m.provider == "anthropic"));
    }
}

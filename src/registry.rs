use crate::{
    config::ProviderConfig,
    error::{ProviderError, Result},
    models::ProviderDescriptor,
    providers::{
        cerebras, groq, moonshot, openai, openrouter, AnthropicClient, GeminiClient,
        ProviderClient, ProviderKind,
    },
};
use std::collections::HashMap;
use std::sync::Arc;

/// Maps stored provider ids to client instances.
pub struct ProviderRegistry {
    providers: HashMap<ProviderKind, Arc<dyn ProviderClient>>,
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new(&ProviderConfig::default())
    }
}

impl ProviderRegistry {
    pub fn new(config: &ProviderConfig) -> Self {
        let providers = ProviderKind::ALL
            .into_iter()
            .map(|kind| (kind, Self::build_client(kind, config)))
            .collect();

        Self { providers }
    }

    fn build_client(kind: ProviderKind, config: &ProviderConfig) -> Arc<dyn ProviderClient> {
        let base_url = config.base_url(kind);
        match kind {
            ProviderKind::OpenAi => Arc::new(openai::client().with_base_url(base_url)),
            ProviderKind::Groq => Arc::new(groq::client().with_base_url(base_url)),
            ProviderKind::Cerebras => Arc::new(cerebras::client().with_base_url(base_url)),
            ProviderKind::Moonshot => Arc::new(moonshot::client().with_base_url(base_url)),
            ProviderKind::OpenRouter => Arc::new(
                openrouter::client(config.site_url.as_deref(), config.site_name.as_deref())
                    .with_base_url(base_url),
            ),
            ProviderKind::Anthropic => Arc::new(AnthropicClient::new().with_base_url(base_url)),
            ProviderKind::Gemini => Arc::new(GeminiClient::new().with_base_url(base_url)),
        }
    }

    /// Replaces the client registered for `kind`.
    pub fn with_client(mut self, kind: ProviderKind, client: Arc<dyn ProviderClient>) -> Self {
        self.providers.insert(kind, client);
        self
    }

    pub fn get(&self, kind: ProviderKind) -> Option<Arc<dyn ProviderClient>> {
        self.providers.get(&kind).cloned()
    }

    /// Looks up a stored provider id. Unknown ids are an error rather than
    /// a silent switch to the default provider.
    pub fn resolve(&self, provider_id: &str) -> Result<Arc<dyn ProviderClient>> {
        let kind: ProviderKind = provider_id.parse()?;
        self.get(kind)
            .ok_or_else(|| ProviderError::UnknownProvider(provider_id.to_string()))
    }

    pub fn descriptors(&self) -> Vec<ProviderDescriptor> {
        ProviderKind::ALL
            .into_iter()
            .filter_map(|kind| self.providers.get(&kind))
            .map(|client| client.descriptor().clone())
            .collect()
    }
}

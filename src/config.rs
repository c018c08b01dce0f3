use crate::{
    error::Result,
    models::GenerationOptions,
    providers::ProviderKind,
    storage::{keys, PreferenceStore},
};
use std::collections::HashMap;
use std::env;

/// Baseline pair used when the user has not chosen anything.
pub const DEFAULT_PROVIDER: ProviderKind = ProviderKind::OpenRouter;

/// How provider clients are built: endpoint overrides and OpenRouter
/// attribution.
#[derive(Debug, Clone, Default)]
pub struct ProviderConfig {
    pub base_urls: HashMap<ProviderKind, String>,
    pub site_url: Option<String>,
    pub site_name: Option<String>,
}

impl ProviderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let base_urls = ProviderKind::ALL
            .into_iter()
            .filter_map(|kind| {
                env::var(kind.base_url_env_var())
                    .ok()
                    .filter(|url| !url.trim().is_empty())
                    .map(|url| (kind, url))
            })
            .collect();

        ProviderConfig {
            base_urls,
            site_url: env::var("OPENROUTER_SITE_URL").ok(),
            site_name: env::var("OPENROUTER_SITE_NAME").ok(),
        }
    }

    pub fn with_base_url(mut self, kind: ProviderKind, url: impl Into<String>) -> Self {
        self.base_urls.insert(kind, url.into());
        self
    }

    pub fn with_site(mut self, url: impl Into<String>, name: impl Into<String>) -> Self {
        self.site_url = Some(url.into());
        self.site_name = Some(name.into());
        self
    }

    pub fn base_url(&self, kind: ProviderKind) -> &str {
        self.base_urls
            .get(&kind)
            .map(String::as_str)
            .unwrap_or_else(|| kind.default_base_url())
    }
}

/// Everything one gateway call needs, supplied by the caller.
///
/// `model_id: None` means the provider's default model.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub provider_id: String,
    pub model_id: Option<String>,
    pub api_key: Option<String>,
    pub options: GenerationOptions,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        GatewayConfig {
            provider_id: DEFAULT_PROVIDER.id().to_string(),
            model_id: None,
            api_key: None,
            options: GenerationOptions::default(),
        }
    }
}

impl GatewayConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let provider_id = env::var("LEARNGEN_PROVIDER")
            .ok()
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_PROVIDER.id().to_string());
        let model_id = env::var("LEARNGEN_MODEL").ok().filter(|m| !m.trim().is_empty());

        let mut options = GenerationOptions::default();
        if let Some(temperature) = env::var("LEARNGEN_TEMPERATURE")
            .ok()
            .and_then(|t| t.parse().ok())
        {
            options.temperature = temperature;
        }
        if let Some(max_tokens) = env::var("LEARNGEN_MAX_TOKENS")
            .ok()
            .and_then(|t| t.parse().ok())
        {
            options.max_tokens = max_tokens;
        }

        let api_key = default_api_key(&provider_id);

        GatewayConfig {
            provider_id,
            model_id,
            api_key,
            options,
        }
    }

    /// Stored preference first; the environment default key fills in a
    /// missing credential.
    pub fn from_store(store: &dyn PreferenceStore) -> Result<Self> {
        let provider_id = store
            .get(keys::SELECTED_PROVIDER)?
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_PROVIDER.id().to_string());
        let model_id = store
            .get(keys::SELECTED_MODEL)?
            .filter(|m| !m.trim().is_empty());
        let api_key = store
            .get(&keys::api_key(&provider_id))?
            .filter(|k| !k.trim().is_empty())
            .or_else(|| default_api_key(&provider_id));

        Ok(GatewayConfig {
            provider_id,
            model_id,
            api_key,
            options: GenerationOptions::default(),
        })
    }

    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider_id = provider.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model_id = Some(model.into());
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }

    /// The configured key, ignoring blanks.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }
}

/// Environment-provided default key for a provider id, if any.
pub fn default_api_key(provider_id: &str) -> Option<String> {
    let kind: ProviderKind = provider_id.parse().ok()?;
    env::var(kind.api_key_env_var())
        .ok()
        .filter(|k| !k.trim().is_empty())
}

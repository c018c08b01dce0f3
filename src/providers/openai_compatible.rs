use crate::{
    error::Result,
    models::{ChatMessage, GenerationOptions, ModelDescriptor, ProviderDescriptor},
    providers::{
        http::{fetch_catalog, non_empty_text, require_api_key, send_json, HintRule},
        traits::ProviderClient,
        ProviderKind,
    },
};
use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue},
    Client,
};
use serde_json::{json, Value};

pub type CatalogParser = fn(&Value) -> Vec<ModelDescriptor>;

/// Everything that differs between vendors speaking the OpenAI chat format.
#[derive(Clone, Copy)]
pub struct CompatibleProfile {
    pub kind: ProviderKind,
    pub default_model: &'static str,
    pub hint_rule: HintRule,
    pub fallback_models: fn() -> Vec<ModelDescriptor>,
    /// `None` means the vendor has no usable catalog endpoint.
    pub parse_catalog: Option<CatalogParser>,
    pub catalog_requires_key: bool,
}

pub struct OpenAiCompatibleClient {
    client: Client,
    profile: CompatibleProfile,
    descriptor: ProviderDescriptor,
    extra_headers: HeaderMap,
}

impl OpenAiCompatibleClient {
    pub fn new(profile: CompatibleProfile) -> Self {
        let kind = profile.kind;
        Self {
            client: Client::new(),
            descriptor: ProviderDescriptor::new(
                kind.id(),
                kind.display_name(),
                kind.default_base_url(),
                profile.parse_catalog.is_some(),
            ),
            profile,
            extra_headers: HeaderMap::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        self.descriptor.endpoint_base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Adds a header sent with every request. Values that are not valid
    /// header text are skipped.
    pub fn with_header(mut self, name: &'static str, value: &str) -> Self {
        match HeaderValue::from_str(value) {
            Ok(value) => {
                self.extra_headers
                    .insert(HeaderName::from_static(name), value);
            }
            Err(e) => log::warn!("⚠️  Ignoring header {}: {}", name, e),
        }
        self
    }

    pub fn extra_headers(&self) -> &HeaderMap {
        &self.extra_headers
    }

    fn base_url(&self) -> &str {
        &self.descriptor.endpoint_base_url
    }

    fn display_name(&self) -> &str {
        &self.descriptor.display_name
    }

    fn fallback(&self) -> Vec<ModelDescriptor> {
        (self.profile.fallback_models)()
    }

    fn build_payload(
        model: &str,
        messages: &[ChatMessage],
        options: &GenerationOptions,
    ) -> Value {
        json!({
            "model": model,
            "messages": messages,
            "temperature": options.temperature,
            "max_tokens": options.max_tokens,
        })
    }
}

#[async_trait]
impl ProviderClient for OpenAiCompatibleClient {
    fn descriptor(&self) -> &ProviderDescriptor {
        &self.descriptor
    }

    fn default_model(&self) -> &str {
        self.profile.default_model
    }

    async fn list_models(&self, api_key: Option<&str>) -> Vec<ModelDescriptor> {
        let Some(parse) = self.profile.parse_catalog else {
            return self.fallback();
        };

        let key = api_key.map(str::trim).filter(|k| !k.is_empty());
        if self.profile.catalog_requires_key && key.is_none() {
            log::debug!(
                "No {} API key, using built-in model list",
                self.display_name()
            );
            return self.fallback();
        }

        let mut request = self
            .client
            .get(format!("{}/models", self.base_url()))
            .headers(self.extra_headers.clone());
        if let Some(key) = key {
            request = request.bearer_auth(key);
        }

        match fetch_catalog(request).await {
            Ok(catalog) => {
                let models = parse(&catalog);
                if models.is_empty() {
                    log::warn!(
                        "⚠️  {} catalog had no usable models, using built-in list",
                        self.display_name()
                    );
                    self.fallback()
                } else {
                    log::debug!("Fetched {} models from {}", models.len(), self.display_name());
                    models
                }
            }
            Err(e) => {
                log::warn!(
                    "⚠️  Failed to fetch {} models, using built-in list: {}",
                    self.display_name(),
                    e
                );
                self.fallback()
            }
        }
    }

    async fn generate_content(
        &self,
        api_key: &str,
        model: &str,
        messages: &[ChatMessage],
        options: Option<&GenerationOptions>,
    ) -> Result<String> {
        let key = require_api_key(api_key, self.display_name())?;
        let options = options.copied().unwrap_or_default();
        let payload = Self::build_payload(model, messages, &options);

        log::info!("Invoking {} model: {}", self.display_name(), model);
        log::debug!("{} request payload: {}", self.display_name(), payload);

        let request = self
            .client
            .post(format!("{}/chat/completions", self.base_url()))
            .headers(self.extra_headers.clone())
            .bearer_auth(key)
            .json(&payload);

        let response = send_json(request, self.display_name(), self.profile.hint_rule).await?;

        non_empty_text(
            response["choices"][0]["message"]["content"].as_str(),
            self.display_name(),
        )
    }
}

/// Reads `data[].id` entries of an OpenAI-style catalog.
pub fn catalog_entries(catalog: &Value) -> impl Iterator<Item = &Value> {
    catalog["data"]
        .as_array()
        .map(|entries| entries.as_slice())
        .unwrap_or_default()
        .iter()
        .filter(|entry| entry["id"].is_string())
}

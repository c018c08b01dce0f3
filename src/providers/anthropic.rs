use crate::{
    error::Result,
    models::{split_system, ChatMessage, GenerationOptions, ModelDescriptor, ProviderDescriptor},
    providers::{
        http::{non_empty_text, rate_limit_hint, require_api_key, send_json, ApiErrorBody},
        traits::ProviderClient,
        ProviderKind,
    },
};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Map, Value};

pub const BASE_URL: &str = "https://api.anthropic.com/v1";
pub const API_VERSION: &str = "2023-06-01";
pub const DEFAULT_MODEL: &str = "claude-3-5-haiku-latest";

pub struct AnthropicClient {
    client: Client,
    descriptor: ProviderDescriptor,
    api_version: String,
}

impl Default for AnthropicClient {
    fn default() -> Self {
        Self::new()
    }
}

impl AnthropicClient {
    pub fn new() -> Self {
        let kind = ProviderKind::Anthropic;
        Self {
            client: Client::new(),
            descriptor: ProviderDescriptor::new(
                kind.id(),
                kind.display_name(),
                BASE_URL,
                false,
            ),
            api_version: API_VERSION.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        self.descriptor.endpoint_base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    /// Anthropic has no in-band system role: system text goes to the
    /// top-level `system` field and only user/assistant turns stay in
    /// `messages`.
    pub fn build_payload(
        model: &str,
        messages: &[ChatMessage],
        options: &GenerationOptions,
    ) -> Value {
        let (system, turns) = split_system(messages);

        let mut payload = Map::new();
        payload.insert("model".into(), json!(model));
        payload.insert("max_tokens".into(), json!(options.max_tokens));
        payload.insert("temperature".into(), json!(options.temperature));
        payload.insert(
            "messages".into(),
            Value::Array(
                turns
                    .iter()
                    .map(|m| json!({"role": m.role.as_str(), "content": m.content}))
                    .collect(),
            ),
        );
        if let Some(system) = system {
            payload.insert("system".into(), json!(system));
        }

        Value::Object(payload)
    }

    pub fn supported_models() -> Vec<ModelDescriptor> {
        [
            ("claude-3-5-haiku-latest", "Claude 3.5 Haiku"),
            ("claude-3-5-sonnet-latest", "Claude 3.5 Sonnet"),
            ("claude-3-7-sonnet-latest", "Claude 3.7 Sonnet"),
            ("claude-sonnet-4-0", "Claude Sonnet 4"),
        ]
        .into_iter()
        .map(|(id, name)| ModelDescriptor::new(id, name, "anthropic").with_context_length(200_000))
        .collect()
    }
}

fn remediation_hint(status: u16, error: &ApiErrorBody) -> Option<String> {
    if status == 429 || error.kind_is("rate_limit_error") {
        return Some(rate_limit_hint(
            "Anthropic",
            "https://console.anthropic.com/settings/limits",
        ));
    }
    if error.message_contains("credit") || error.message_contains("balance") {
        return Some(
            "Your Anthropic credit balance is too low. Buy credits at https://console.anthropic.com/settings/billing"
                .to_string(),
        );
    }
    if status == 401 || error.kind_is("authentication_error") || error.message_contains("API key") {
        return Some(
            "Check your Anthropic API key at https://console.anthropic.com/settings/keys"
                .to_string(),
        );
    }
    if status == 529 || error.kind_is("overloaded_error") {
        return Some("Anthropic is temporarily overloaded. Try again in a minute".to_string());
    }
    None
}

#[async_trait]
impl ProviderClient for AnthropicClient {
    fn descriptor(&self) -> &ProviderDescriptor {
        &self.descriptor
    }

    fn default_model(&self) -> &str {
        DEFAULT_MODEL
    }

    async fn list_models(&self, _api_key: Option<&str>) -> Vec<ModelDescriptor> {
        Self::supported_models()
    }

    async fn generate_content(
        &self,
        api_key: &str,
        model: &str,
        messages: &[ChatMessage],
        options: Option<&GenerationOptions>,
    ) -> Result<String> {
        let display_name = self.descriptor.display_name.as_str();
        let key = require_api_key(api_key, display_name)?;
        let options = options.copied().unwrap_or_default();
        let payload = Self::build_payload(model, messages, &options);

        log::info!("Invoking Anthropic model: {}", model);
        log::debug!("Anthropic request payload: {}", payload);

        let request = self
            .client
            .post(format!("{}/messages", self.descriptor.endpoint_base_url))
            .header("x-api-key", key)
            .header("anthropic-version", self.api_version.as_str())
            .json(&payload);

        let response = send_json(request, display_name, remediation_hint).await?;

        non_empty_text(response["content"][0]["text"].as_str(), display_name)
    }
}

use crate::{
    error::Result,
    models::{
        split_system, ChatMessage, ChatRole, GenerationOptions, ModelDescriptor,
        ProviderDescriptor,
    },
    providers::{
        http::{non_empty_text, rate_limit_hint, require_api_key, send_json, ApiErrorBody},
        traits::ProviderClient,
        ProviderKind,
    },
};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Map, Value};

pub const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

pub struct GeminiClient {
    client: Client,
    descriptor: ProviderDescriptor,
}

impl Default for GeminiClient {
    fn default() -> Self {
        Self::new()
    }
}

impl GeminiClient {
    pub fn new() -> Self {
        let kind = ProviderKind::Gemini;
        Self {
            client: Client::new(),
            descriptor: ProviderDescriptor::new(
                kind.id(),
                kind.display_name(),
                BASE_URL,
                false,
            ),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        self.descriptor.endpoint_base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    fn gemini_role(role: ChatRole) -> &'static str {
        match role {
            ChatRole::Assistant => "model",
            ChatRole::User | ChatRole::System => "user",
        }
    }

    /// System text becomes `systemInstruction`; turns are remapped to
    /// Gemini's `user`/`model` roles.
    pub fn build_payload(messages: &[ChatMessage], options: &GenerationOptions) -> Value {
        let (system, turns) = split_system(messages);

        let contents: Vec<Value> = turns
            .iter()
            .map(|m| {
                json!({
                    "role": Self::gemini_role(m.role),
                    "parts": [{"text": m.content}],
                })
            })
            .collect();

        let mut payload = Map::new();
        payload.insert("contents".into(), Value::Array(contents));
        if let Some(system) = system {
            payload.insert(
                "systemInstruction".into(),
                json!({"parts": [{"text": system}]}),
            );
        }
        payload.insert(
            "generationConfig".into(),
            json!({
                "temperature": options.temperature,
                "maxOutputTokens": options.max_tokens,
            }),
        );

        Value::Object(payload)
    }

    pub fn supported_models() -> Vec<ModelDescriptor> {
        vec![
            ModelDescriptor::new("gemini-2.0-flash", "Gemini 2.0 Flash", "gemini")
                .free()
                .with_context_length(1_048_576),
            ModelDescriptor::new("gemini-2.0-flash-lite", "Gemini 2.0 Flash-Lite", "gemini")
                .free()
                .with_context_length(1_048_576),
            ModelDescriptor::new("gemini-1.5-flash", "Gemini 1.5 Flash", "gemini")
                .free()
                .with_context_length(1_048_576),
            ModelDescriptor::new("gemini-1.5-pro", "Gemini 1.5 Pro", "gemini")
                .with_context_length(2_097_152),
        ]
    }
}

fn remediation_hint(status: u16, error: &ApiErrorBody) -> Option<String> {
    if status == 429 || error.kind_is("RESOURCE_EXHAUSTED") {
        return Some(rate_limit_hint(
            "Gemini",
            "https://aistudio.google.com/app/usage (the free tier has a per-minute quota)",
        ));
    }
    if error.message_contains("API key")
        || error.kind_is("PERMISSION_DENIED")
        || error.kind_is("UNAUTHENTICATED")
    {
        return Some(
            "Create or check your Gemini API key at https://aistudio.google.com/app/apikey"
                .to_string(),
        );
    }
    if error.message_contains("quota") {
        return Some(
            "Your Gemini quota is used up. Review it at https://aistudio.google.com/app/usage"
                .to_string(),
        );
    }
    None
}

#[async_trait]
impl ProviderClient for GeminiClient {
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
        let payload = Self::build_payload(messages, &options);

        log::info!("Invoking Gemini model: {}", model);
        log::debug!("Gemini request payload: {}", payload);

        // The key travels in the query string, not a header.
        let request = self
            .client
            .post(format!(
                "{}/models/{}:generateContent",
                self.descriptor.endpoint_base_url, model
            ))
            .query(&[("key", key)])
            .json(&payload);

        let response = send_json(request, display_name, remediation_hint).await?;

        non_empty_text(
            response["candidates"][0]["content"]["parts"][0]["text"].as_str(),
            display_name,
        )
    }
}

use crate::{
    models::ModelDescriptor,
    providers::{
        http::{rate_limit_hint, ApiErrorBody},
        openai_compatible::{CompatibleProfile, OpenAiCompatibleClient},
        ProviderKind,
    },
};

pub const BASE_URL: &str = "https://api.cerebras.ai/v1";
pub const DEFAULT_MODEL: &str = "llama3.1-8b";

pub fn profile() -> CompatibleProfile {
    CompatibleProfile {
        kind: ProviderKind::Cerebras,
        default_model: DEFAULT_MODEL,
        hint_rule: remediation_hint,
        fallback_models,
        parse_catalog: None,
        catalog_requires_key: false,
    }
}

pub fn client() -> OpenAiCompatibleClient {
    OpenAiCompatibleClient::new(profile())
}

pub fn fallback_models() -> Vec<ModelDescriptor> {
    [
        ("llama3.1-8b", "Llama 3.1 8B"),
        ("llama-3.3-70b", "Llama 3.3 70B"),
        ("qwen-3-32b", "Qwen 3 32B"),
    ]
    .into_iter()
    .map(|(id, name)| {
        ModelDescriptor::new(id, name, "cerebras")
            .free()
            .with_context_length(8_192)
    })
    .collect()
}

fn remediation_hint(status: u16, error: &ApiErrorBody) -> Option<String> {
    if status == 429 {
        return Some(rate_limit_hint("Cerebras", "https://cloud.cerebras.ai/platform"));
    }
    if status == 401 || error.code_is("wrong_api_key") || error.message_contains("API key") {
        return Some(
            "Get a Cerebras API key at https://cloud.cerebras.ai/platform".to_string(),
        );
    }
    None
}

use crate::{
    models::ModelDescriptor,
    providers::{
        http::{rate_limit_hint, ApiErrorBody},
        openai_compatible::{catalog_entries, CompatibleProfile, OpenAiCompatibleClient},
        ProviderKind,
    },
};
use serde_json::Value;

pub const BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

pub fn profile() -> CompatibleProfile {
    CompatibleProfile {
        kind: ProviderKind::OpenAi,
        default_model: DEFAULT_MODEL,
        hint_rule: remediation_hint,
        fallback_models,
        parse_catalog: Some(parse_catalog),
        catalog_requires_key: true,
    }
}

pub fn client() -> OpenAiCompatibleClient {
    OpenAiCompatibleClient::new(profile())
}

pub fn fallback_models() -> Vec<ModelDescriptor> {
    [
        ("gpt-4o-mini", "GPT-4o mini"),
        ("gpt-4o", "GPT-4o"),
        ("gpt-4.1-mini", "GPT-4.1 mini"),
        ("gpt-3.5-turbo", "GPT-3.5 Turbo"),
    ]
    .into_iter()
    .map(|(id, name)| ModelDescriptor::new(id, name, "openai"))
    .collect()
}

/// Chat models only, newest-looking id first.
fn parse_catalog(catalog: &Value) -> Vec<ModelDescriptor> {
    let mut models: Vec<ModelDescriptor> = catalog_entries(catalog)
        .filter_map(|entry| entry["id"].as_str())
        .filter(|id| id.starts_with("gpt-"))
        .map(|id| ModelDescriptor::new(id, id, "openai"))
        .collect();
    models.sort_by(|a, b| b.id.cmp(&a.id));
    models
}

fn remediation_hint(status: u16, error: &ApiErrorBody) -> Option<String> {
    let quota = error.code_is("insufficient_quota") || error.message_contains("quota");

    if status == 429 {
        let mut hint = rate_limit_hint("OpenAI", "https://platform.openai.com/account/limits");
        if quota {
            hint.push_str(". Your quota is used up; add billing at https://platform.openai.com/account/billing");
        }
        return Some(hint);
    }
    if quota {
        return Some(
            "Your OpenAI quota is used up. Add billing at https://platform.openai.com/account/billing"
                .to_string(),
        );
    }
    if status == 401 || error.code_is("invalid_api_key") || error.message_contains("API key") {
        return Some(
            "Check your OpenAI API key at https://platform.openai.com/api-keys".to_string(),
        );
    }
    None
}

use crate::{
    models::ModelDescriptor,
    providers::{
        http::{rate_limit_hint, ApiErrorBody},
        openai_compatible::{catalog_entries, CompatibleProfile, OpenAiCompatibleClient},
        ProviderKind,
    },
};
use serde_json::Value;

pub const BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";

pub fn profile() -> CompatibleProfile {
    CompatibleProfile {
        kind: ProviderKind::Groq,
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
        ("llama-3.1-8b-instant", "Llama 3.1 8B Instant", 131_072),
        ("llama-3.3-70b-versatile", "Llama 3.3 70B Versatile", 131_072),
        ("gemma2-9b-it", "Gemma 2 9B", 8_192),
        ("mixtral-8x7b-32768", "Mixtral 8x7B", 32_768),
    ]
    .into_iter()
    .map(|(id, name, context)| {
        ModelDescriptor::new(id, name, "groq")
            .free()
            .with_context_length(context)
    })
    .collect()
}

// Groq's catalog order is kept as-is.
fn parse_catalog(catalog: &Value) -> Vec<ModelDescriptor> {
    catalog_entries(catalog)
        .filter(|entry| entry["active"].as_bool().unwrap_or(true))
        .filter_map(|entry| {
            let id = entry["id"].as_str()?;
            let mut model = ModelDescriptor::new(id, id, "groq").free();
            if let Some(context) = entry["context_window"]
                .as_u64()
                .and_then(|c| u32::try_from(c).ok())
            {
                model = model.with_context_length(context);
            }
            Some(model)
        })
        .collect()
}

fn remediation_hint(status: u16, error: &ApiErrorBody) -> Option<String> {
    if status == 429 {
        return Some(rate_limit_hint("Groq", "https://console.groq.com/settings/limits"));
    }
    if status == 401 || error.code_is("invalid_api_key") || error.message_contains("API key") {
        return Some("Create a free Groq API key at https://console.groq.com/keys".to_string());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_catalog_keeps_remote_order_and_skips_inactive() {
        let catalog = json!({"data": [
            {"id": "mixtral-8x7b-32768", "context_window": 32768},
            {"id": "old-model", "active": false},
            {"id": "gemma2-9b-it", "context_window": 8192}
        ]});
        let models = parse_catalog(&catalog);
        assert_eq!(models.len(), 2);
        assert_eq!(models[0].id, "mixtral-8x7b-32768");
        assert_eq!(models[0].context_length, Some(32768));
        assert!(models.iter().all(|m| m.is_free));
    }

    #[test]
    fn test_oversized_context_window_is_dropped() {
        let catalog = json!({"data": [{"id": "huge", "context_window": 5_000_000_000u64}]});
        let models = parse_catalog(&catalog);
        assert_eq!(models.len(), 1);
        assert_eq!(models[0].context_length, None);
    }

    #[test]
    fn test_invalid_key_hint() {
        let error = ApiErrorBody::parse(
            r#"{"error":{"message":"Invalid API Key","type":"invalid_request_error","code":"invalid_api_key"}}"#,
        );
        assert!(remediation_hint(401, &error).unwrap().contains("console.groq.com/keys"));
    }
}

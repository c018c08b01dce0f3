use crate::{
    models::ModelDescriptor,
    providers::{
        http::{rate_limit_hint, ApiErrorBody},
        openai_compatible::{catalog_entries, CompatibleProfile, OpenAiCompatibleClient},
        ProviderKind,
    },
};
use serde_json::Value;

pub const BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_MODEL: &str = "meta-llama/llama-3.3-70b-instruct:free";

pub fn profile() -> CompatibleProfile {
    CompatibleProfile {
        kind: ProviderKind::OpenRouter,
        default_model: DEFAULT_MODEL,
        hint_rule: remediation_hint,
        fallback_models,
        parse_catalog: Some(parse_catalog),
        catalog_requires_key: false,
    }
}

/// OpenRouter attributes traffic through the `HTTP-Referer` and `X-Title`
/// headers.
pub fn client(site_url: Option<&str>, site_name: Option<&str>) -> OpenAiCompatibleClient {
    let mut client = OpenAiCompatibleClient::new(profile());
    if let Some(url) = site_url {
        client = client.with_header("http-referer", url);
    }
    if let Some(name) = site_name {
        client = client.with_header("x-title", name);
    }
    client
}

pub fn fallback_models() -> Vec<ModelDescriptor> {
    let mut models: Vec<ModelDescriptor> = [
        ("meta-llama/llama-3.3-70b-instruct:free", "Llama 3.3 70B Instruct (free)", 131_072),
        ("google/gemma-3-27b-it:free", "Gemma 3 27B (free)", 96_000),
        ("mistralai/mistral-7b-instruct:free", "Mistral 7B Instruct (free)", 32_768),
        ("deepseek/deepseek-chat-v3-0324:free", "DeepSeek V3 (free)", 163_840),
        ("qwen/qwen-2.5-72b-instruct:free", "Qwen 2.5 72B Instruct (free)", 32_768),
    ]
    .into_iter()
    .map(|(id, name, context)| {
        ModelDescriptor::new(id, name, provider_of(id))
            .free()
            .with_context_length(context)
    })
    .collect();
    sort_models(&mut models);
    models
}

/// The vendor half of an `vendor/model` id.
pub fn provider_of(id: &str) -> &str {
    id.split_once('/').map(|(vendor, _)| vendor).unwrap_or(id)
}

fn is_zero_price(price: &Value) -> bool {
    match price {
        Value::String(s) => s.parse::<f64>().map(|p| p == 0.0).unwrap_or(false),
        Value::Number(n) => n.as_f64() == Some(0.0),
        _ => false,
    }
}

pub fn is_free(entry: &Value) -> bool {
    let id = entry["id"].as_str().unwrap_or_default();
    id.ends_with(":free")
        || (is_zero_price(&entry["pricing"]["prompt"])
            && is_zero_price(&entry["pricing"]["completion"]))
}

/// Free models first, then by vendor, then by id.
pub fn sort_models(models: &mut [ModelDescriptor]) {
    models.sort_by(|a, b| {
        b.is_free
            .cmp(&a.is_free)
            .then_with(|| a.provider.cmp(&b.provider))
            .then_with(|| a.id.cmp(&b.id))
    });
}

fn parse_catalog(catalog: &Value) -> Vec<ModelDescriptor> {
    let mut models: Vec<ModelDescriptor> = catalog_entries(catalog)
        .filter_map(|entry| {
            let id = entry["id"].as_str()?;
            let name = entry["name"].as_str().unwrap_or(id);
            let mut model = ModelDescriptor::new(id, name, provider_of(id));
            model.is_free = is_free(entry);
            if let Some(context) = entry["context_length"]
                .as_u64()
                .and_then(|c| u32::try_from(c).ok())
            {
                model = model.with_context_length(context);
            }
            Some(model)
        })
        .collect();
    sort_models(&mut models);
    models
}

fn remediation_hint(status: u16, error: &ApiErrorBody) -> Option<String> {
    if status == 429 {
        return Some(rate_limit_hint(
            "OpenRouter",
            "https://openrouter.ai/settings/credits (free models allow only a few requests per minute)",
        ));
    }
    if status == 402 || error.message_contains("credit") {
        return Some(
            "Your OpenRouter account is out of credits. Add credits at https://openrouter.ai/credits or pick a model ending in :free".to_string(),
        );
    }
    if status == 401 || error.message_contains("API key") || error.message_contains("auth credentials") {
        return Some("Create an OpenRouter API key at https://openrouter.ai/keys".to_string());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_free_detection() {
        assert!(is_free(&json!({"id": "x/y:free"})));
        assert!(is_free(&json!({"id": "x/y", "pricing": {"prompt": "0", "completion": "0"}})));
        assert!(!is_free(&json!({"id": "x/y", "pricing": {"prompt": "0", "completion": "0.000002"}})));
        assert!(!is_free(&json!({"id": "x/y"})));
    }

    #[test]
    fn test_catalog_puts_free_models_first() {
        let catalog = json!({"data": [
            {"id": "openai/gpt-4o", "name": "GPT-4o", "pricing": {"prompt": "0.0000025", "completion": "0.00001"}},
            {"id": "mistralai/mistral-7b-instruct:free", "name": "Mistral 7B", "context_length": 32768},
            {"id": "anthropic/claude-3.5-sonnet", "name": "Claude 3.5 Sonnet", "pricing": {"prompt": "0.000003", "completion": "0.000015"}},
            {"id": "google/gemma-3-27b-it", "name": "Gemma 3", "pricing": {"prompt": "0", "completion": "0"}}
        ]});

        let models = parse_catalog(&catalog);
        let ids: Vec<&str> = models.iter().map(|m| m.id.as_str()).collect();

        assert_eq!(
            ids,
            vec![
                "google/gemma-3-27b-it",
                "mistralai/mistral-7b-instruct:free",
                "anthropic/claude-3.5-sonnet",
                "openai/gpt-4o",
            ]
        );
        assert_eq!(models[1].context_length, Some(32768));
    }

    #[test]
    fn test_sort_is_monotone_in_freeness() {
        let mut models: Vec<ModelDescriptor> = (0..20)
            .map(|i| {
                let mut m = ModelDescriptor::new(format!("v{}/m{}", i % 4, i), "m", format!("v{}", i % 4));
                m.is_free = i % 3 == 0;
                m
            })
            .collect();
        sort_models(&mut models);

        let first_paid = models.iter().position(|m| !m.is_free).unwrap_or(models.len());
        assert!(models[first_paid..].iter().all(|m| !m.is_free));
    }

    #[test]
    fn test_provider_of() {
        assert_eq!(provider_of("meta-llama/llama-3.3-70b-instruct:free"), "meta-llama");
        assert_eq!(provider_of("openrouter-auto"), "openrouter-auto");
    }

    #[test]
    fn test_credit_hint() {
        let error = ApiErrorBody::parse(r#"{"error":{"message":"Insufficient credits","code":402}}"#);
        assert!(remediation_hint(402, &error).unwrap().contains("openrouter.ai/credits"));
    }

    #[test]
    fn test_attribution_headers() {
        let client = client(Some("https://learngen.app"), Some("Learngen"));
        assert!(client.extra_headers().contains_key("http-referer"));
        assert!(client.extra_headers().contains_key("x-title"));
    }
}

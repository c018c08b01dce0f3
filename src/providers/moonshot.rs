use crate::{
    models::ModelDescriptor,
    providers::{
        http::{rate_limit_hint, ApiErrorBody},
        openai_compatible::{CompatibleProfile, OpenAiCompatibleClient},
        ProviderKind,
    },
};

pub const BASE_URL: &str = "https://api.z.ai/api/coding/paas/v4";
pub const DEFAULT_MODEL: &str = "glm-4.6";

/// Z.AI error code for an exhausted account balance.
const INSUFFICIENT_BALANCE: &str = "1113";

pub fn profile() -> CompatibleProfile {
    CompatibleProfile {
        kind: ProviderKind::Moonshot,
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
        ("glm-4.6", "GLM-4.6", 200_000),
        ("glm-4.5", "GLM-4.5", 128_000),
        ("glm-4.5-air", "GLM-4.5 Air", 128_000),
    ]
    .into_iter()
    .map(|(id, name, context)| ModelDescriptor::new(id, name, "moonshot").with_context_length(context))
    .collect()
}

fn remediation_hint(status: u16, error: &ApiErrorBody) -> Option<String> {
    if status == 429 && !error.code_is(INSUFFICIENT_BALANCE) {
        return Some(rate_limit_hint("Z.AI", "https://z.ai/manage-apikey/rate-limits"));
    }
    if error.code_is(INSUFFICIENT_BALANCE)
        || error.message_contains("balance")
        || error.message_contains("insufficient")
    {
        let tip = "Your Z.AI balance is empty. Top up at https://z.ai/manage-apikey/billing";
        return Some(if status == 429 {
            format!("{}. {}", rate_limit_hint("Z.AI", "https://z.ai/manage-apikey/rate-limits"), tip)
        } else {
            tip.to_string()
        });
    }
    if status == 401 || error.message_contains("API key") || error.message_contains("token") {
        return Some(
            "Check your Z.AI API key at https://z.ai/manage-apikey/apikey-list".to_string(),
        );
    }
    None
}

use crate::error::{ProviderError, Result};
use reqwest::{RequestBuilder, StatusCode};
use serde_json::Value;

/// Provider-specific remediation rule, evaluated once per failed request.
pub type HintRule = fn(u16, &ApiErrorBody) -> Option<String>;

/// The fields we can dig out of any vendor's error envelope.
///
/// Handles `{"error":{"message","type","code"}}` (OpenAI family, Anthropic),
/// `{"error":{"message","status","code"}}` (Gemini), a flat
/// `{"message","type","code"}` (Cerebras) and `{"error":"text"}`. A body
/// that is not JSON parses as an empty envelope.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApiErrorBody {
    pub message: Option<String>,
    pub code: Option<String>,
    pub kind: Option<String>,
}

impl ApiErrorBody {
    pub fn parse(body: &str) -> Self {
        let value: Value =
            serde_json::from_str(body).unwrap_or_else(|_| Value::Object(Default::default()));
        Self::from_value(&value)
    }

    fn from_value(value: &Value) -> Self {
        let error = &value["error"];

        let message = error
            .get("message")
            .and_then(Value::as_str)
            .or_else(|| error.as_str())
            .or_else(|| value.get("message").and_then(Value::as_str))
            .map(str::to_string);

        let code = error
            .get("code")
            .or_else(|| value.get("code"))
            .and_then(scalar_to_string);

        let kind = error
            .get("type")
            .or_else(|| error.get("status"))
            .or_else(|| value.get("type"))
            .and_then(Value::as_str)
            .map(str::to_string);

        Self {
            message,
            code,
            kind,
        }
    }

    /// Case-insensitive substring test against the vendor message.
    pub fn message_contains(&self, needle: &str) -> bool {
        self.message
            .as_deref()
            .map(|m| m.to_lowercase().contains(&needle.to_lowercase()))
            .unwrap_or(false)
    }

    pub fn code_is(&self, code: &str) -> bool {
        self.code.as_deref() == Some(code)
    }

    pub fn kind_is(&self, kind: &str) -> bool {
        self.kind.as_deref() == Some(kind)
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub fn rate_limit_hint(display_name: &str, console_url: &str) -> String {
    format!(
        "Rate limit reached for {}. Wait a moment and retry, or check your limits at {}",
        display_name, console_url
    )
}

pub fn require_api_key<'a>(api_key: &'a str, display_name: &str) -> Result<&'a str> {
    let key = api_key.trim();
    if key.is_empty() {
        log::warn!("⚠️  {} call rejected: no API key configured", display_name);
        return Err(ProviderError::missing_credential(display_name));
    }
    Ok(key)
}

/// Turns a non-success response into the single error surfaced to callers.
pub fn request_failure(
    display_name: &str,
    status: StatusCode,
    body: &str,
    hint_rule: HintRule,
) -> ProviderError {
    let parsed = ApiErrorBody::parse(body);
    let message = parsed.message.clone().unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string()
    });
    let hint = hint_rule(status.as_u16(), &parsed);

    log::error!(
        "❌ {} request failed with status {}: {}",
        display_name,
        status.as_u16(),
        message
    );

    ProviderError::RequestFailure {
        provider: display_name.to_string(),
        status: status.as_u16(),
        message,
        hint,
    }
}

/// Sends one request and returns the decoded JSON body of a 2xx answer.
pub async fn send_json(
    request: RequestBuilder,
    display_name: &str,
    hint_rule: HintRule,
) -> Result<Value> {
    // Gemini carries the key in the query string, so URLs stay out of errors.
    let response = request.send().await.map_err(|e| {
        let e = e.without_url();
        log::error!("❌ {} transport error: {}", display_name, e);
        ProviderError::TransportFailure(format!("{} request failed: {}", display_name, e))
    })?;

    let status = response.status();
    let body = response.text().await.map_err(|e| {
        let e = e.without_url();
        ProviderError::TransportFailure(format!("{} response unreadable: {}", display_name, e))
    })?;

    if !status.is_success() {
        return Err(request_failure(display_name, status, &body, hint_rule));
    }

    serde_json::from_str(&body).map_err(|e| {
        ProviderError::ResponseError(format!("{} returned invalid JSON: {}", display_name, e))
    })
}

/// Fetches a catalog document; any failure is reported as `TransportFailure`
/// so the caller can fall back.
pub async fn fetch_catalog(request: RequestBuilder) -> Result<Value> {
    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(ProviderError::TransportFailure(format!(
            "catalog request returned {}",
            status
        )));
    }
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| ProviderError::TransportFailure(e.to_string()))
}

pub fn non_empty_text(text: Option<&str>, display_name: &str) -> Result<String> {
    match text {
        Some(text) => Ok(text.to_string()),
        None => Err(ProviderError::ResponseError(format!(
            "{} response contained no text",
            display_name
        ))),
    }
}

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{provider} API key is required")]
    MissingCredential { provider: String },

    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    #[error("Unknown learning mode: {0}")]
    UnknownMode(String),

    #[error("Transport error: {0}")]
    TransportFailure(String),

    /// Non-2xx answer from a generation endpoint. `message` is whatever the
    /// vendor said; `hint` is an actionable tip when one of the provider's
    /// remediation rules matched.
    #[error("{provider} API error ({status}): {message}{}", format_hint(.hint))]
    RequestFailure {
        provider: String,
        status: u16,
        message: String,
        hint: Option<String>,
    },

    #[error("Response error: {0}")]
    ResponseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

fn format_hint(hint: &Option<String>) -> String {
    match hint {
        Some(hint) => format!(" Tip: {}", hint),
        None => String::new(),
    }
}

impl ProviderError {
    pub fn missing_credential(provider: impl Into<String>) -> Self {
        ProviderError::MissingCredential {
            provider: provider.into(),
        }
    }

    pub fn is_missing_credential(&self) -> bool {
        matches!(self, ProviderError::MissingCredential { .. })
    }

    /// HTTP status of a failed generation request, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ProviderError::RequestFailure { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn hint(&self) -> Option<&str> {
        match self {
            ProviderError::RequestFailure { hint, .. } => hint.as_deref(),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        ProviderError::TransportFailure(err.without_url().to_string())
    }
}

impl From<serde_json::Error> for ProviderError {
    fn from(err: serde_json::Error) -> Self {
        ProviderError::SerializationError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ProviderError>;

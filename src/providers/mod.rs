pub mod anthropic;
pub mod cerebras;
pub mod gemini;
pub mod groq;
pub mod http;
pub mod moonshot;
pub mod openai;
pub mod openai_compatible;
pub mod openrouter;
pub mod traits;

use crate::error::{ProviderError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use anthropic::AnthropicClient;
pub use gemini::GeminiClient;
pub use openai_compatible::OpenAiCompatibleClient;
pub use traits::ProviderClient;

/// The closed set of supported vendors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    OpenAi,
    Anthropic,
    Gemini,
    Groq,
    Cerebras,
    Moonshot,
    OpenRouter,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 7] = [
        ProviderKind::OpenRouter,
        ProviderKind::Groq,
        ProviderKind::Cerebras,
        ProviderKind::OpenAi,
        ProviderKind::Anthropic,
        ProviderKind::Gemini,
        ProviderKind::Moonshot,
    ];

    /// Stable key used for stored preferences.
    pub fn id(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "openai",
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::Gemini => "gemini",
            ProviderKind::Groq => "groq",
            ProviderKind::Cerebras => "cerebras",
            ProviderKind::Moonshot => "moonshot",
            ProviderKind::OpenRouter => "openrouter",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "OpenAI",
            ProviderKind::Anthropic => "Anthropic",
            ProviderKind::Gemini => "Gemini",
            ProviderKind::Groq => "Groq",
            ProviderKind::Cerebras => "Cerebras",
            ProviderKind::Moonshot => "Z.AI",
            ProviderKind::OpenRouter => "OpenRouter",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => openai::BASE_URL,
            ProviderKind::Anthropic => anthropic::BASE_URL,
            ProviderKind::Gemini => gemini::BASE_URL,
            ProviderKind::Groq => groq::BASE_URL,
            ProviderKind::Cerebras => cerebras::BASE_URL,
            ProviderKind::Moonshot => moonshot::BASE_URL,
            ProviderKind::OpenRouter => openrouter::BASE_URL,
        }
    }

    /// Environment variable holding the default API key for this provider.
    pub fn api_key_env_var(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "OPENAI_API_KEY",
            ProviderKind::Anthropic => "ANTHROPIC_API_KEY",
            ProviderKind::Gemini => "GEMINI_API_KEY",
            ProviderKind::Groq => "GROQ_API_KEY",
            ProviderKind::Cerebras => "CEREBRAS_API_KEY",
            ProviderKind::Moonshot => "ZAI_API_KEY",
            ProviderKind::OpenRouter => "OPENROUTER_API_KEY",
        }
    }

    /// Environment variable overriding the endpoint base URL.
    pub fn base_url_env_var(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "OPENAI_BASE_URL",
            ProviderKind::Anthropic => "ANTHROPIC_BASE_URL",
            ProviderKind::Gemini => "GEMINI_BASE_URL",
            ProviderKind::Groq => "GROQ_BASE_URL",
            ProviderKind::Cerebras => "CEREBRAS_BASE_URL",
            ProviderKind::Moonshot => "ZAI_BASE_URL",
            ProviderKind::OpenRouter => "OPENROUTER_BASE_URL",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ProviderKind {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self> {
        ProviderKind::ALL
            .into_iter()
            .find(|kind| kind.id() == s)
            .ok_or_else(|| ProviderError::UnknownProvider(s.to_string()))
    }
}

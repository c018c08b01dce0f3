pub mod config;
pub mod error;
pub mod gateway;
pub mod logger;
pub mod models;
pub mod prompts;
pub mod providers;
pub mod registry;
pub mod storage;

pub use config::{GatewayConfig, ProviderConfig, DEFAULT_PROVIDER};
pub use error::{ProviderError, Result};
pub use gateway::LearningGateway;
pub use models::{
    ChatMessage, ChatRole, GenerationOptions, ModelDescriptor, ProviderDescriptor,
};
pub use prompts::{render_prompt, LearningMode, SYSTEM_PROMPT};
pub use providers::{AnthropicClient, GeminiClient, OpenAiCompatibleClient, ProviderClient, ProviderKind};
pub use registry::ProviderRegistry;
pub use storage::{JsonFilePreferenceStore, MemoryPreferenceStore, PreferenceStore};

use serde::{Deserialize, Serialize};

/// Static description of one provider implementation.
///
/// `id` is the key stored as the user's provider preference. Renaming it
/// orphans every saved preference.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProviderDescriptor {
    pub id: String,
    pub display_name: String,
    pub endpoint_base_url: String,
    pub supports_list_models: bool,
}

impl ProviderDescriptor {
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        endpoint_base_url: impl Into<String>,
        supports_list_models: bool,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            endpoint_base_url: endpoint_base_url.into(),
            supports_list_models,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ModelDescriptor {
    pub id: String,
    pub name: String,
    pub provider: String,
    pub is_free: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_length: Option<u32>,
}

impl ModelDescriptor {
    pub fn new(id: impl Into<String>, name: impl Into<String>, provider: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            provider: provider.into(),
            is_free: false,
            context_length: None,
        }
    }

    pub fn free(mut self) -> Self {
        self.is_free = true;
        self
    }

    pub fn with_context_length(mut self, context_length: u32) -> Self {
        self.context_length = Some(context_length);
        self
    }
}

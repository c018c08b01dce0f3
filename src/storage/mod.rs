pub mod file;
pub mod memory;
pub mod traits;

use crate::error::Result;

pub use file::JsonFilePreferenceStore;
pub use memory::MemoryPreferenceStore;
pub use traits::PreferenceStore;

pub mod keys {
    pub const SELECTED_PROVIDER: &str = "selected_provider";
    pub const SELECTED_MODEL: &str = "selected_model";

    pub fn api_key(provider_id: &str) -> String {
        format!("{}_api_key", provider_id)
    }
}

pub fn save_selection(store: &dyn PreferenceStore, provider_id: &str, model_id: &str) -> Result<()> {
    store.set(keys::SELECTED_PROVIDER, provider_id)?;
    store.set(keys::SELECTED_MODEL, model_id)
}

pub fn save_api_key(store: &dyn PreferenceStore, provider_id: &str, api_key: &str) -> Result<()> {
    store.set(&keys::api_key(provider_id), api_key)
}

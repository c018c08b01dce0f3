use crate::error::Result;

/// Key-value store holding the user's provider choice and API keys.
///
/// Reads are synchronous and happen once per gateway call.
pub trait PreferenceStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

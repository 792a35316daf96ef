//! Durable key-value trait for client-local persistence.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::result::AppResult;

/// Trait for durable client-side key-value storage.
///
/// Holds the bearer token, the user profile, the volume snapshot and UI
/// preferences. Values are strings (JSON where structured). Writes are
/// synchronous: a `set` that returns `Ok` has reached durable storage.
pub trait KeyValueStore: Send + Sync + std::fmt::Debug + 'static {
    /// Get a value by key. Returns `None` if the key does not exist.
    fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Set a value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> AppResult<()>;

    /// Remove a key. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> AppResult<()>;
}

impl dyn KeyValueStore {
    /// Get a typed value by deserializing from JSON.
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> AppResult<Option<T>> {
        match self.get(key)? {
            Some(value) => {
                let parsed = serde_json::from_str(&value)?;
                Ok(Some(parsed))
            }
            None => Ok(None),
        }
    }

    /// Set a typed value by serializing to JSON.
    pub fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> AppResult<()> {
        let json = serde_json::to_string(value)?;
        self.set(key, &json)
    }
}

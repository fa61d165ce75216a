use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::twitch::constants::token_storage_key;
use crate::twitch::error::LoginResult;

/// String key/value storage the token store writes through.
///
/// This is the seam that replaces the browser's `localStorage` singleton: hosts inject
/// whichever backend fits their platform and tests substitute [`InMemoryStorage`].
pub trait KeyValueStorage: Send + Sync {
    fn get(&self, key: &str) -> LoginResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> LoginResult<()>;
    /// Removing an absent key is not an error.
    fn remove(&self, key: &str) -> LoginResult<()>;
}

#[derive(Default, Debug)]
pub struct InMemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl InMemoryStorage {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

impl KeyValueStorage for InMemoryStorage {
    fn get(&self, key: &str) -> LoginResult<Option<String>> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> LoginResult<()> {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> LoginResult<()> {
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod file;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStorage;

#[cfg(all(target_arch = "wasm32", feature = "wasm-web"))]
mod web;

#[cfg(all(target_arch = "wasm32", feature = "wasm-web"))]
pub use web::{WebStorage, WebStorageDriver};

/// Single-credential store scoped to one provider identity (`"{provider_id}_token"`).
///
/// Holds no copy of the token: every read goes to the backing storage.
#[derive(Clone)]
pub struct TokenStore {
    storage: Arc<dyn KeyValueStorage>,
    key: String,
}

impl std::fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenStore").field("key", &self.key).finish()
    }
}

impl TokenStore {
    pub fn new(provider_id: &str, storage: Arc<dyn KeyValueStorage>) -> Self {
        Self {
            storage,
            key: token_storage_key(provider_id),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn persist(&self, token: &str) -> LoginResult<()> {
        self.storage.set(&self.key, token)
    }

    pub fn retrieve(&self) -> LoginResult<Option<String>> {
        self.storage.get(&self.key)
    }

    pub fn clear(&self) -> LoginResult<()> {
        self.storage.remove(&self.key)
    }
}

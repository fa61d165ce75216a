use wasm_bindgen::JsValue;
use web_sys::{Storage, Window};

use crate::twitch::error::{storage_error, LoginError, LoginResult};
use crate::twitch::persistence::KeyValueStorage;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum WebStorageDriver {
    Local,
    Session,
}

/// Browser `localStorage` / `sessionStorage` backend.
///
/// The handle is looked up on every call, so the type holds no JS objects and stays
/// `Send + Sync`.
#[derive(Clone, Copy, Debug)]
pub struct WebStorage {
    driver: WebStorageDriver,
}

impl Default for WebStorage {
    fn default() -> Self {
        Self::new(WebStorageDriver::Local)
    }
}

impl WebStorage {
    pub fn new(driver: WebStorageDriver) -> Self {
        Self { driver }
    }

    fn storage(&self) -> Result<Storage, LoginError> {
        let window = Self::window()?;
        match self.driver {
            WebStorageDriver::Local => window.local_storage().map_err(map_js_error)?,
            WebStorageDriver::Session => window.session_storage().map_err(map_js_error)?,
        }
        .ok_or_else(|| storage_error("Web storage API is unavailable"))
    }

    fn window() -> Result<Window, LoginError> {
        web_sys::window()
            .ok_or_else(|| storage_error("window object is not available in this environment"))
    }
}

impl KeyValueStorage for WebStorage {
    fn get(&self, key: &str) -> LoginResult<Option<String>> {
        self.storage()?.get_item(key).map_err(map_js_error)
    }

    fn set(&self, key: &str, value: &str) -> LoginResult<()> {
        self.storage()?.set_item(key, value).map_err(map_js_error)
    }

    fn remove(&self, key: &str) -> LoginResult<()> {
        self.storage()?.remove_item(key).map_err(map_js_error)
    }
}

fn map_js_error(err: JsValue) -> LoginError {
    storage_error(format!(
        "Web storage error: {}",
        crate::platform::browser::stringify_js_error(&err)
    ))
}

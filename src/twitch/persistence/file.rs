use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use percent_encoding::{percent_encode, NON_ALPHANUMERIC};

use crate::twitch::constants::CACHE_DIR_ENV;
use crate::twitch::error::{storage_error, LoginResult};
use crate::twitch::persistence::KeyValueStorage;

/// Native storage keeping one file per key under a cache directory.
#[derive(Clone, Debug)]
pub struct FileStorage {
    base_dir: Arc<PathBuf>,
}

impl FileStorage {
    pub fn new(base_dir: impl AsRef<Path>) -> LoginResult<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir).map_err(|err| {
            storage_error(format!(
                "Failed to create login cache directory '{}': {}",
                base_dir.display(),
                err
            ))
        })?;
        Ok(Self {
            base_dir: Arc::new(base_dir),
        })
    }

    /// Uses `TWITCH_LOGIN_CACHE_DIR` when set, `./.twitch-login` otherwise.
    pub fn from_env() -> LoginResult<Self> {
        if let Ok(dir) = std::env::var(CACHE_DIR_ENV) {
            return Self::new(PathBuf::from(dir));
        }

        let dir = std::env::current_dir()
            .map_err(|err| storage_error(format!("Failed to obtain working directory: {err}")))?
            .join(".twitch-login");
        Self::new(dir)
    }

    fn file_for(&self, key: &str) -> PathBuf {
        let encoded = percent_encode(key.as_bytes(), NON_ALPHANUMERIC).to_string();
        self.base_dir.join(encoded)
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> LoginResult<Option<String>> {
        let path = self.file_for(key);
        if !path.exists() {
            return Ok(None);
        }
        let value = fs::read_to_string(&path).map_err(|err| {
            storage_error(format!(
                "Failed to read login cache '{}': {}",
                path.display(),
                err
            ))
        })?;
        Ok(Some(value))
    }

    fn set(&self, key: &str, value: &str) -> LoginResult<()> {
        let path = self.file_for(key);
        fs::write(&path, value).map_err(|err| {
            storage_error(format!(
                "Failed to write login cache '{}': {}",
                path.display(),
                err
            ))
        })
    }

    fn remove(&self, key: &str) -> LoginResult<()> {
        let path = self.file_for(key);
        if path.exists() {
            fs::remove_file(&path).map_err(|err| {
                storage_error(format!(
                    "Failed to delete login cache '{}': {}",
                    path.display(),
                    err
                ))
            })?;
        }
        Ok(())
    }
}

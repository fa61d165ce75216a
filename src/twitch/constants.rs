use std::time::Duration;

/// Identity reported in [`crate::twitch::SocialUser::provider`] and used as the storage key prefix.
pub const PROVIDER_ID: &str = "TWITCH";

pub const DEFAULT_ID_BASE_URL: &str = "https://id.twitch.tv/oauth2";
pub const DEFAULT_HELIX_BASE_URL: &str = "https://api.twitch.tv/helix";

pub(crate) const ID_BASE_URL_ENV: &str = "TWITCH_ID_BASE_URL";
pub(crate) const HELIX_BASE_URL_ENV: &str = "TWITCH_HELIX_BASE_URL";
pub(crate) const CACHE_DIR_ENV: &str = "TWITCH_LOGIN_CACHE_DIR";

pub const DEFAULT_RESPONSE_TYPE: &str = "token";

pub const POPUP_NAME: &str = "twitch-popup";
pub const POPUP_WIDTH: u32 = 500;
pub const POPUP_HEIGHT: u32 = 600;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Text Chromium puts in the `SecurityError` raised when reading a cross-origin location.
pub const CROSS_ORIGIN_MARKER: &str = "Blocked a frame with origin";

pub(crate) fn token_storage_key(provider_id: &str) -> String {
    format!("{provider_id}_token")
}

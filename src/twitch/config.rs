use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::twitch::constants::{
    DEFAULT_HELIX_BASE_URL, DEFAULT_ID_BASE_URL, DEFAULT_POLL_INTERVAL, HELIX_BASE_URL_ENV,
    ID_BASE_URL_ENV,
};

/// OAuth scopes requested from Twitch, either a single pre-formatted string or a list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scopes {
    Single(String),
    List(Vec<String>),
}

impl Scopes {
    /// Value of the `scope` query parameter: lists are comma-joined, a single scope is kept as is.
    pub fn to_query_value(&self) -> String {
        match self {
            Scopes::Single(scope) => scope.clone(),
            Scopes::List(scopes) => scopes.join(","),
        }
    }
}

impl From<&str> for Scopes {
    fn from(value: &str) -> Self {
        Scopes::Single(value.to_owned())
    }
}

impl From<String> for Scopes {
    fn from(value: String) -> Self {
        Scopes::Single(value)
    }
}

impl From<Vec<String>> for Scopes {
    fn from(value: Vec<String>) -> Self {
        Scopes::List(value)
    }
}

impl From<Vec<&str>> for Scopes {
    fn from(value: Vec<&str>) -> Self {
        Scopes::List(value.into_iter().map(str::to_owned).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Scopes {
    fn from(value: [&str; N]) -> Self {
        Scopes::List(value.iter().map(|scope| (*scope).to_owned()).collect())
    }
}

/// Options of the implicit-grant authorization request.
///
/// Deserializes from the same camelCase JSON shape web hosts already use
/// (`{"redirectUri": "...", "scopes": ["user:read:email"]}`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TwitchInitOptions {
    /// Registered redirect URI. The access token is sent to this URI and it must match the
    /// application settings on the Twitch console.
    pub redirect_uri: String,
    /// Forces the user to re-authorize the application. Twitch defaults to `false`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub force_verify: Option<bool>,
    /// Must be `token` for the implicit grant flow; defaults to it when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_type: Option<String>,
    pub scopes: Scopes,
}

impl TwitchInitOptions {
    pub fn new(redirect_uri: impl Into<String>, scopes: impl Into<Scopes>) -> Self {
        Self {
            redirect_uri: redirect_uri.into(),
            force_verify: None,
            response_type: None,
            scopes: scopes.into(),
        }
    }

    pub fn with_force_verify(mut self, force_verify: bool) -> Self {
        self.force_verify = Some(force_verify);
        self
    }

    pub fn with_response_type(mut self, response_type: impl Into<String>) -> Self {
        self.response_type = Some(response_type.into());
        self
    }
}

/// Remote endpoints consumed by the provider.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TwitchEndpoints {
    pub authorize: String,
    pub validate: String,
    pub revoke: String,
    pub users: String,
}

impl Default for TwitchEndpoints {
    fn default() -> Self {
        Self::from_base_urls(DEFAULT_ID_BASE_URL, DEFAULT_HELIX_BASE_URL)
    }
}

impl TwitchEndpoints {
    pub fn from_base_urls(id_base_url: &str, helix_base_url: &str) -> Self {
        let id_base = id_base_url.trim_end_matches('/');
        let helix_base = helix_base_url.trim_end_matches('/');
        Self {
            authorize: format!("{id_base}/authorize"),
            validate: format!("{id_base}/validate"),
            revoke: format!("{id_base}/revoke"),
            users: format!("{helix_base}/users"),
        }
    }

    /// Default endpoints, with the base URLs overridable through `TWITCH_ID_BASE_URL` and
    /// `TWITCH_HELIX_BASE_URL` (useful against the Twitch CLI mock server).
    pub fn from_env() -> Self {
        let id_base = std::env::var(ID_BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_ID_BASE_URL.into());
        let helix_base =
            std::env::var(HELIX_BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_HELIX_BASE_URL.into());
        Self::from_base_urls(&id_base, &helix_base)
    }

    pub fn with_id_base_url(self, id_base_url: &str) -> Self {
        let fresh = Self::from_base_urls(id_base_url, DEFAULT_HELIX_BASE_URL);
        Self {
            authorize: fresh.authorize,
            validate: fresh.validate,
            revoke: fresh.revoke,
            users: self.users,
        }
    }

    pub fn with_helix_base_url(self, helix_base_url: &str) -> Self {
        let fresh = Self::from_base_urls(DEFAULT_ID_BASE_URL, helix_base_url);
        Self {
            users: fresh.users,
            ..self
        }
    }
}

/// Timing of the popup poll loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HandshakeOptions {
    pub poll_interval: Duration,
    /// Upper bound for the whole handshake. `None` polls until the popup is closed or redirects.
    pub max_duration: Option<Duration>,
}

impl Default for HandshakeOptions {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_duration: None,
        }
    }
}

//! # Twitch login
//!
//! Client-side sign-in with Twitch through the OAuth2 implicit grant. A popup window is pointed
//! at the Twitch authorize endpoint and polled until it lands back on the redirect URI with an
//! access token in the fragment. The token is then persisted, checked against the validation
//! endpoint on later page loads, exchanged for the Helix user record and finally revoked on
//! sign-out.
//!
//! ## Features
//!
//! - Deterministic authorize URL construction (`client_id`, `force_verify`, `redirect_uri`,
//!   `response_type`, `scope`).
//! - Popup handshake with cross-origin tolerant polling and an optional overall deadline.
//! - Token persistence through an injected [`KeyValueStorage`] (memory, files, or
//!   `localStorage` in the browser).
//! - Session validation, profile normalization into [`SocialUser`] and token revocation.
//!
//! No `state` parameter is sent or checked, so the redirect is not bound to the request.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use twitch_login_rs::twitch::{
//!     FileStorage, LoginResult, TwitchInitOptions, TwitchLoginProvider,
//! };
//!
//! async fn current_user() -> LoginResult<()> {
//!     let provider = TwitchLoginProvider::builder(
//!         "your-client-id",
//!         TwitchInitOptions::new("http://localhost:4200", vec!["user:read:email"]),
//!     )
//!     .with_storage(Arc::new(FileStorage::from_env()?))
//!     .build()?;
//!
//!     match provider.get_login_status().await {
//!         Ok(user) => println!("signed in as {} <{}>", user.name, user.email),
//!         Err(err) => println!("not signed in: {err}"),
//!     }
//!     Ok(())
//! }
//! ```

pub mod api;
mod config;
pub mod constants;
pub mod error;
mod logger;
pub mod oauth;
pub mod persistence;
pub mod profile;
pub mod transport;
pub mod types;

#[doc(inline)]
pub use api::{TwitchLoginProvider, TwitchLoginProviderBuilder};

#[doc(inline)]
pub use config::{HandshakeOptions, Scopes, TwitchEndpoints, TwitchInitOptions};

pub use constants::PROVIDER_ID;

#[doc(inline)]
pub use error::{LoginError, LoginErrorCode, LoginResult};

pub(crate) use logger::LOGGER;

#[doc(inline)]
pub use oauth::{
    build_auth_url, parse_redirect, HandshakeSession, HandshakeState, PopupAccessError,
    PopupFeatures, PopupOpener, PopupWindow, RedirectOutcome, ScreenGeometry,
};

#[cfg(not(target_arch = "wasm32"))]
#[doc(inline)]
pub use persistence::FileStorage;
#[doc(inline)]
pub use persistence::{InMemoryStorage, KeyValueStorage, TokenStore};
#[cfg(all(target_arch = "wasm32", feature = "wasm-web"))]
#[doc(inline)]
pub use persistence::{WebStorage, WebStorageDriver};

#[doc(inline)]
pub use profile::{fetch_profile, validate_token, HelixUser, TokenValidation};

#[doc(inline)]
pub use transport::{HttpMethod, HttpRequest, HttpTransport, ReqwestTransport, RequestBody};

#[doc(inline)]
pub use types::{SocialLoginProvider, SocialUser};

use std::sync::Arc;

#[cfg(not(target_arch = "wasm32"))]
use crate::twitch::persistence::InMemoryStorage;
#[cfg(all(target_arch = "wasm32", feature = "wasm-web"))]
use crate::platform::browser::popup::WebPopupOpener;
#[cfg(all(target_arch = "wasm32", feature = "wasm-web"))]
use crate::twitch::persistence::WebStorage;

use crate::twitch::config::{HandshakeOptions, TwitchEndpoints, TwitchInitOptions};
use crate::twitch::constants::PROVIDER_ID;
use crate::twitch::error::{
    invalid_argument, invalid_credential, not_logged_in, LoginError, LoginResult,
};
use crate::twitch::oauth::{build_auth_url, HandshakeSession, PopupOpener};
use crate::twitch::persistence::{KeyValueStorage, TokenStore};
use crate::twitch::profile::{fetch_profile, validate_token};
use crate::twitch::transport::{HttpRequest, HttpTransport, ReqwestTransport, RequestBody};
use crate::twitch::types::{SocialLoginProvider, SocialUser};
use crate::twitch::LOGGER;

/// Twitch sign-in through the OAuth2 implicit grant and a popup window.
///
/// The access token is the only state kept between calls, and it lives in the configured
/// [`KeyValueStorage`]; every operation reads it back from there.
pub struct TwitchLoginProvider {
    client_id: String,
    init_options: TwitchInitOptions,
    endpoints: TwitchEndpoints,
    handshake: HandshakeOptions,
    tokens: TokenStore,
    transport: Arc<dyn HttpTransport>,
    popup_opener: Option<Arc<dyn PopupOpener>>,
}

impl TwitchLoginProvider {
    pub fn builder(
        client_id: impl Into<String>,
        init_options: TwitchInitOptions,
    ) -> TwitchLoginProviderBuilder {
        TwitchLoginProviderBuilder::new(client_id.into(), init_options)
    }

    pub fn new(client_id: impl Into<String>, init_options: TwitchInitOptions) -> LoginResult<Self> {
        Self::builder(client_id, init_options).build()
    }

    pub fn provider_id(&self) -> &'static str {
        PROVIDER_ID
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn init_options(&self) -> &TwitchInitOptions {
        &self.init_options
    }

    pub fn endpoints(&self) -> &TwitchEndpoints {
        &self.endpoints
    }

    /// The authorize URL the popup is pointed at.
    pub fn authorization_url(&self) -> LoginResult<String> {
        build_auth_url(&self.endpoints.authorize, &self.client_id, &self.init_options)
    }

    /// Nothing to load for Twitch; kept so every provider exposes the same lifecycle.
    pub async fn initialize(&self) -> LoginResult<()> {
        Ok(())
    }

    /// Resolves the profile of the stored session, if that session is still valid.
    ///
    /// Without a stored token this fails with `login/not-logged-in` and makes no request. A
    /// token the validation endpoint rejects is removed from storage and reported as
    /// `login/invalid-credential`.
    pub async fn get_login_status(&self) -> LoginResult<SocialUser> {
        let token = self.require_token()?;

        if validate_token(self.transport.as_ref(), &self.endpoints, &token)
            .await
            .is_none()
        {
            LOGGER.info("stored Twitch token is no longer valid; clearing it");
            self.tokens.clear()?;
            return Err(invalid_credential(PROVIDER_ID));
        }

        fetch_profile(
            self.transport.as_ref(),
            &self.endpoints,
            &self.client_id,
            &token,
        )
        .await
    }

    /// Runs the popup handshake and returns the signed-in profile.
    ///
    /// The token is persisted as soon as the redirect yields it and again once the profile has
    /// been fetched.
    pub async fn sign_in(&self) -> LoginResult<SocialUser> {
        let opener = self
            .popup_opener
            .as_deref()
            .ok_or_else(|| invalid_argument("No popup opener configured for Twitch sign-in"))?;
        let auth_url = self.authorization_url()?;
        LOGGER.debug(format!("opening Twitch authorization popup at {auth_url}"));

        let mut session = HandshakeSession::new(opener, self.handshake);
        session
            .run(&auth_url, |token| async move {
                self.tokens.persist(&token)?;
                let user = fetch_profile(
                    self.transport.as_ref(),
                    &self.endpoints,
                    &self.client_id,
                    &token,
                )
                .await?;
                self.tokens.persist(&token)?;
                Ok::<_, LoginError>(user)
            })
            .await
    }

    /// Revokes the stored token and forgets it.
    ///
    /// Storage is only cleared once the revoke endpoint accepted the token.
    pub async fn sign_out(&self) -> LoginResult<()> {
        let token = self.require_token()?;

        let request = HttpRequest::post(self.endpoints.revoke.as_str()).with_body(
            RequestBody::Form(vec![
                ("client_id".to_string(), self.client_id.clone()),
                ("token".to_string(), token),
            ]),
        );
        self.transport.send(request).await?;

        self.tokens.clear()?;
        LOGGER.info("signed out of Twitch");
        Ok(())
    }

    pub fn persist_token(&self, token: &str) -> LoginResult<()> {
        self.tokens.persist(token)
    }

    pub fn retrieve_token(&self) -> LoginResult<Option<String>> {
        self.tokens.retrieve()
    }

    pub fn clear_token(&self) -> LoginResult<()> {
        self.tokens.clear()
    }

    fn require_token(&self) -> LoginResult<String> {
        self.tokens
            .retrieve()?
            .ok_or_else(|| not_logged_in(PROVIDER_ID))
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
impl SocialLoginProvider for TwitchLoginProvider {
    fn provider_id(&self) -> &str {
        PROVIDER_ID
    }

    async fn initialize(&self) -> LoginResult<()> {
        TwitchLoginProvider::initialize(self).await
    }

    async fn get_login_status(&self) -> LoginResult<SocialUser> {
        TwitchLoginProvider::get_login_status(self).await
    }

    async fn sign_in(&self) -> LoginResult<SocialUser> {
        TwitchLoginProvider::sign_in(self).await
    }

    async fn sign_out(&self) -> LoginResult<()> {
        TwitchLoginProvider::sign_out(self).await
    }
}

pub struct TwitchLoginProviderBuilder {
    client_id: String,
    init_options: TwitchInitOptions,
    endpoints: Option<TwitchEndpoints>,
    handshake: HandshakeOptions,
    storage: Option<Arc<dyn KeyValueStorage>>,
    transport: Option<Arc<dyn HttpTransport>>,
    popup_opener: Option<Arc<dyn PopupOpener>>,
}

impl TwitchLoginProviderBuilder {
    fn new(client_id: String, init_options: TwitchInitOptions) -> Self {
        Self {
            client_id,
            init_options,
            endpoints: None,
            handshake: HandshakeOptions::default(),
            storage: None,
            transport: None,
            popup_opener: None,
        }
    }

    pub fn with_storage(mut self, storage: Arc<dyn KeyValueStorage>) -> Self {
        self.storage = Some(storage);
        self
    }

    pub fn with_transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn with_popup_opener(mut self, opener: Arc<dyn PopupOpener>) -> Self {
        self.popup_opener = Some(opener);
        self
    }

    pub fn with_endpoints(mut self, endpoints: TwitchEndpoints) -> Self {
        self.endpoints = Some(endpoints);
        self
    }

    pub fn with_handshake_options(mut self, options: HandshakeOptions) -> Self {
        self.handshake = options;
        self
    }

    /// Bounds the whole popup handshake; unbounded unless set.
    pub fn with_max_handshake_duration(mut self, max_duration: std::time::Duration) -> Self {
        self.handshake.max_duration = Some(max_duration);
        self
    }

    pub fn build(self) -> LoginResult<TwitchLoginProvider> {
        if self.client_id.trim().is_empty() {
            return Err(invalid_argument("Twitch client id must not be empty"));
        }

        let storage = match self.storage {
            Some(storage) => storage,
            None => default_storage(),
        };
        let transport = self
            .transport
            .unwrap_or_else(|| Arc::new(ReqwestTransport::default()));
        let popup_opener = self.popup_opener.or_else(default_popup_opener);

        Ok(TwitchLoginProvider {
            client_id: self.client_id,
            init_options: self.init_options,
            endpoints: self.endpoints.unwrap_or_else(TwitchEndpoints::from_env),
            handshake: self.handshake,
            tokens: TokenStore::new(PROVIDER_ID, storage),
            transport,
            popup_opener,
        })
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn default_storage() -> Arc<dyn KeyValueStorage> {
    InMemoryStorage::shared()
}

#[cfg(all(target_arch = "wasm32", feature = "wasm-web"))]
fn default_storage() -> Arc<dyn KeyValueStorage> {
    Arc::new(WebStorage::default())
}

#[cfg(not(target_arch = "wasm32"))]
fn default_popup_opener() -> Option<Arc<dyn PopupOpener>> {
    None
}

#[cfg(all(target_arch = "wasm32", feature = "wasm-web"))]
fn default_popup_opener() -> Option<Arc<dyn PopupOpener>> {
    WebPopupOpener::from_global().map(|opener| Arc::new(opener) as Arc<dyn PopupOpener>)
}

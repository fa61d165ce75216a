use std::fmt;
use std::future::Future;

use url::Url;

use crate::platform::runtime::{now_millis, sleep};
use crate::twitch::config::HandshakeOptions;
use crate::twitch::constants::{CROSS_ORIGIN_MARKER, POPUP_HEIGHT, POPUP_NAME, POPUP_WIDTH};
use crate::twitch::error::{
    handshake_timeout, malformed_response, popup_blocked, popup_failure, provider_error,
    user_cancelled, LoginError, LoginResult,
};
use crate::twitch::oauth::redirect::{parse_redirect, RedirectOutcome};
use crate::twitch::LOGGER;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScreenGeometry {
    pub width: u32,
    pub height: u32,
}

/// Size and placement of the popup window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PopupFeatures {
    pub width: u32,
    pub height: u32,
    pub left: i32,
    pub top: i32,
}

impl PopupFeatures {
    /// A 500x600 window centered on the given screen.
    pub fn centered(screen: ScreenGeometry) -> Self {
        Self {
            width: POPUP_WIDTH,
            height: POPUP_HEIGHT,
            left: screen.width as i32 / 2 - POPUP_WIDTH as i32 / 2,
            top: screen.height as i32 / 2 - POPUP_HEIGHT as i32 / 2,
        }
    }

    /// `window.open` feature string.
    pub fn to_feature_string(&self) -> String {
        format!(
            "width={},height={},left={},top={},resizable=yes,scrollbars=yes,status=yes",
            self.width, self.height, self.left, self.top
        )
    }
}

/// Why the popup location could not be read.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PopupAccessError {
    /// The popup is still on another origin. Expected while the user is on the provider's pages.
    CrossOrigin(String),
    Other(String),
}

impl PopupAccessError {
    /// Classifies a raw exception text coming out of the browser.
    pub fn from_message(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.contains(CROSS_ORIGIN_MARKER) {
            PopupAccessError::CrossOrigin(message)
        } else {
            PopupAccessError::Other(message)
        }
    }
}

impl fmt::Display for PopupAccessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PopupAccessError::CrossOrigin(message) | PopupAccessError::Other(message) => {
                f.write_str(message)
            }
        }
    }
}

/// Handle to an opened popup window.
pub trait PopupWindow: Send + Sync {
    fn is_closed(&self) -> bool;
    /// Current `href` of the popup.
    fn location(&self) -> Result<String, PopupAccessError>;
    fn close(&self);
}

/// Opens popups on behalf of the handshake.
pub trait PopupOpener: Send + Sync {
    fn screen(&self) -> ScreenGeometry;
    /// Origin of the page hosting the sign-in (the redirect URI must live on it).
    fn host_origin(&self) -> LoginResult<String>;
    /// `Ok(None)` means the window could not be opened, typically because of a popup blocker.
    fn open(
        &self,
        url: &str,
        name: &str,
        features: &PopupFeatures,
    ) -> LoginResult<Option<Box<dyn PopupWindow>>>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HandshakeState {
    Idle,
    PopupOpened,
    Polling,
    Succeeded,
    ClosedByUser,
    Failed,
    TimedOut,
}

impl HandshakeState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            HandshakeState::Succeeded
                | HandshakeState::ClosedByUser
                | HandshakeState::Failed
                | HandshakeState::TimedOut
        )
    }
}

enum Tick {
    Continue,
    Token(String),
    Failed(LoginError),
}

/// One popup sign-in attempt.
///
/// The session owns the popup handle for the duration of [`HandshakeSession::run`]; polling
/// happens inside that single future, so ticks never overlap and nothing keeps running once
/// it returns.
pub struct HandshakeSession<'a> {
    opener: &'a dyn PopupOpener,
    options: HandshakeOptions,
    state: HandshakeState,
    transitions: Vec<HandshakeState>,
}

impl<'a> HandshakeSession<'a> {
    pub fn new(opener: &'a dyn PopupOpener, options: HandshakeOptions) -> Self {
        Self {
            opener,
            options,
            state: HandshakeState::Idle,
            transitions: vec![HandshakeState::Idle],
        }
    }

    pub fn state(&self) -> HandshakeState {
        self.state
    }

    /// Every state visited so far, starting with `Idle`.
    pub fn transitions(&self) -> &[HandshakeState] {
        &self.transitions
    }

    /// Opens the popup on `auth_url` and polls it until a terminal state.
    ///
    /// When the redirect carries an access token, `on_token` runs before the session settles:
    /// its success moves the session to `Succeeded`, its failure to `Failed`.
    pub async fn run<F, Fut, T>(&mut self, auth_url: &str, on_token: F) -> LoginResult<T>
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = LoginResult<T>>,
    {
        let expected_origin = self.opener.host_origin()?;
        let features = PopupFeatures::centered(self.opener.screen());

        let popup = match self.opener.open(auth_url, POPUP_NAME, &features) {
            Ok(Some(popup)) => popup,
            Ok(None) => {
                self.transition(HandshakeState::Failed);
                return Err(popup_blocked());
            }
            Err(err) => {
                self.transition(HandshakeState::Failed);
                return Err(err);
            }
        };
        self.transition(HandshakeState::PopupOpened);

        let started_at = now_millis();
        self.transition(HandshakeState::Polling);

        let token = loop {
            sleep(self.options.poll_interval).await;

            match self.tick(popup.as_ref(), &expected_origin) {
                Tick::Continue => {}
                Tick::Failed(err) => return Err(err),
                Tick::Token(token) => break token,
            }

            if let Some(max_duration) = self.options.max_duration {
                let waited = now_millis().saturating_sub(started_at);
                if u128::from(waited) >= max_duration.as_millis() {
                    popup.close();
                    self.transition(HandshakeState::TimedOut);
                    return Err(handshake_timeout(waited));
                }
            }
        };

        let result = on_token(token).await;
        self.transition(match result {
            Ok(_) => HandshakeState::Succeeded,
            Err(_) => HandshakeState::Failed,
        });
        result
    }

    fn tick(&mut self, popup: &dyn PopupWindow, expected_origin: &str) -> Tick {
        if popup.is_closed() {
            self.transition(HandshakeState::ClosedByUser);
            return Tick::Failed(user_cancelled());
        }

        let href = match popup.location() {
            Ok(href) => href,
            Err(PopupAccessError::CrossOrigin(_)) => return Tick::Continue,
            Err(PopupAccessError::Other(reason)) => {
                LOGGER.warn(format!("popup location access failed: {reason}"));
                popup.close();
                self.transition(HandshakeState::Failed);
                return Tick::Failed(popup_failure(&reason));
            }
        };

        let Ok(location) = Url::parse(&href) else {
            return Tick::Continue;
        };
        if location.origin().ascii_serialization() != expected_origin {
            return Tick::Continue;
        }

        match parse_redirect(&location) {
            RedirectOutcome::Pending => Tick::Continue,
            RedirectOutcome::Token(token) => {
                popup.close();
                Tick::Token(token)
            }
            RedirectOutcome::ProviderError { error, description } => {
                popup.close();
                self.transition(HandshakeState::Failed);
                let description = description.unwrap_or(error);
                Tick::Failed(provider_error(&description))
            }
            RedirectOutcome::Malformed => {
                popup.close();
                self.transition(HandshakeState::Failed);
                Tick::Failed(malformed_response("Twitch authentication failed."))
            }
        }
    }

    fn transition(&mut self, next: HandshakeState) {
        LOGGER.debug(format!("popup handshake {:?} -> {:?}", self.state, next));
        if next.is_terminal() {
            LOGGER.info(format!("Twitch popup handshake finished as {next:?}"));
        }
        self.state = next;
        self.transitions.push(next);
    }
}

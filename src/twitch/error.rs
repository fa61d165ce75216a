use std::fmt::{Display, Formatter};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoginErrorCode {
    /// No credential is stored for the provider.
    NotLoggedIn,
    /// The stored credential was rejected by the validation endpoint.
    InvalidCredential,
    PopupBlocked,
    /// The user closed the popup before the handshake completed.
    UserCancelled,
    /// The provider redirected back with `error`/`error_description`.
    ProviderError,
    TransportFailure,
    MalformedResponse,
    /// The popup raised something other than the expected cross-origin access error.
    PopupFailure,
    HandshakeTimeout,
    Storage,
    InvalidArgument,
}

impl LoginErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoginErrorCode::NotLoggedIn => "login/not-logged-in",
            LoginErrorCode::InvalidCredential => "login/invalid-credential",
            LoginErrorCode::PopupBlocked => "login/popup-blocked",
            LoginErrorCode::UserCancelled => "login/user-cancelled",
            LoginErrorCode::ProviderError => "login/provider-error",
            LoginErrorCode::TransportFailure => "login/transport-failure",
            LoginErrorCode::MalformedResponse => "login/malformed-response",
            LoginErrorCode::PopupFailure => "login/popup-failure",
            LoginErrorCode::HandshakeTimeout => "login/handshake-timeout",
            LoginErrorCode::Storage => "login/storage",
            LoginErrorCode::InvalidArgument => "login/invalid-argument",
        }
    }
}

#[derive(Clone, Debug)]
pub struct LoginError {
    pub code: LoginErrorCode,
    message: String,
    status: Option<u16>,
}

impl LoginError {
    pub fn new(code: LoginErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            status: None,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn code_str(&self) -> &'static str {
        self.code.as_str()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// HTTP status of the failed request, for transport failures that reached the server.
    pub fn status(&self) -> Option<u16> {
        self.status
    }
}

impl Display for LoginError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code_str())
    }
}

impl std::error::Error for LoginError {}

pub type LoginResult<T> = Result<T, LoginError>;

pub fn not_logged_in(provider_id: &str) -> LoginError {
    LoginError::new(
        LoginErrorCode::NotLoggedIn,
        format!("No user is currently logged in with {provider_id}"),
    )
}

pub fn invalid_credential(provider_id: &str) -> LoginError {
    LoginError::new(
        LoginErrorCode::InvalidCredential,
        format!("Access token for {provider_id} is not valid"),
    )
}

pub fn popup_blocked() -> LoginError {
    LoginError::new(
        LoginErrorCode::PopupBlocked,
        "Unable to open Twitch authentication popup window.",
    )
}

pub fn user_cancelled() -> LoginError {
    LoginError::new(
        LoginErrorCode::UserCancelled,
        "Twitch authentication window was closed.",
    )
}

pub fn provider_error(description: &str) -> LoginError {
    LoginError::new(
        LoginErrorCode::ProviderError,
        format!("Twitch authentication failed: {description}"),
    )
}

pub fn popup_failure(reason: &str) -> LoginError {
    LoginError::new(
        LoginErrorCode::PopupFailure,
        format!("Twitch authentication failed: {reason}"),
    )
}

pub fn transport_failure(message: impl Into<String>) -> LoginError {
    LoginError::new(LoginErrorCode::TransportFailure, message)
}

pub fn malformed_response(message: impl Into<String>) -> LoginError {
    LoginError::new(LoginErrorCode::MalformedResponse, message)
}

pub fn handshake_timeout(waited_ms: u64) -> LoginError {
    LoginError::new(
        LoginErrorCode::HandshakeTimeout,
        format!("Twitch authentication did not complete within {waited_ms} ms"),
    )
}

pub fn storage_error(message: impl Into<String>) -> LoginError {
    LoginError::new(LoginErrorCode::Storage, message)
}

pub fn invalid_argument(message: impl Into<String>) -> LoginError {
    LoginError::new(LoginErrorCode::InvalidArgument, message)
}

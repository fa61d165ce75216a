use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::twitch::config::TwitchEndpoints;
use crate::twitch::constants::PROVIDER_ID;
use crate::twitch::error::{malformed_response, LoginResult};
use crate::twitch::transport::{HttpRequest, HttpTransport};
use crate::twitch::types::SocialUser;
use crate::twitch::LOGGER;

/// Body of the token validation endpoint.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TokenValidation {
    #[serde(deserialize_with = "null_as_default")]
    pub client_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub login: String,
    #[serde(deserialize_with = "null_as_default")]
    pub scopes: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub user_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub expires_in: u64,
}

/// One entry of the Helix `users` response.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HelixUser {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub login: String,
    #[serde(deserialize_with = "null_as_default")]
    pub display_name: String,
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub user_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub broadcaster_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub profile_image_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub offline_image_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(deserialize_with = "null_as_default")]
    pub created_at: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct HelixUsersResponse {
    #[serde(deserialize_with = "null_as_default")]
    data: Vec<HelixUser>,
}

impl HelixUser {
    /// Maps the Twitch record onto the shared profile shape.
    pub fn into_social_user(self, access_token: &str) -> SocialUser {
        SocialUser {
            provider: PROVIDER_ID.to_string(),
            id: self.id,
            name: self.display_name,
            email: self.email,
            photo_url: self.profile_image_url,
            auth_token: access_token.to_string(),
            ..SocialUser::default()
        }
    }
}

/// Asks the identity endpoint whether `access_token` is still usable.
///
/// Returns `None` when it is not. Every failure (non-2xx status or network error) counts as
/// invalid; the body is only parsed for its metadata.
pub async fn validate_token(
    transport: &dyn HttpTransport,
    endpoints: &TwitchEndpoints,
    access_token: &str,
) -> Option<TokenValidation> {
    let request = HttpRequest::get(endpoints.validate.as_str())
        .with_header("Authorization", format!("OAuth {access_token}"));

    match transport.send(request).await {
        Ok(body) => Some(serde_json::from_value(body).unwrap_or_default()),
        Err(err) => {
            LOGGER.debug(format!("token validation rejected: {err}"));
            None
        }
    }
}

/// Fetches the profile of the user owning `access_token`.
pub async fn fetch_profile(
    transport: &dyn HttpTransport,
    endpoints: &TwitchEndpoints,
    client_id: &str,
    access_token: &str,
) -> LoginResult<SocialUser> {
    let request = HttpRequest::get(endpoints.users.as_str())
        .with_header("Authorization", format!("Bearer {access_token}"))
        .with_header("Client-Id", client_id);

    let body = transport.send(request).await?;
    let user = first_user(body)?;
    Ok(user.into_social_user(access_token))
}

/// Twitch sends `null` for some absent fields; those read as the field's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn first_user(body: Value) -> LoginResult<HelixUser> {
    let response: HelixUsersResponse = serde_json::from_value(body)
        .map_err(|err| malformed_response(format!("Unexpected Twitch users response: {err}")))?;
    response
        .data
        .into_iter()
        .next()
        .ok_or_else(|| malformed_response("Twitch users response contained no user"))
}

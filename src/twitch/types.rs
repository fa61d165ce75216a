use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::twitch::error::LoginResult;

/// Provider-agnostic profile returned by a successful sign-in or status check.
///
/// Every field is a plain string; values the provider does not supply are empty.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SocialUser {
    pub provider: String,
    pub id: String,
    pub name: String,
    pub email: String,
    pub photo_url: String,
    pub first_name: String,
    pub last_name: String,
    pub auth_token: String,
    pub id_token: String,
    pub authorization_code: String,
    pub response: String,
}

/// Common surface of a social login provider, for hosts juggling several of them.
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait SocialLoginProvider: Send + Sync {
    fn provider_id(&self) -> &str;

    async fn initialize(&self) -> LoginResult<()>;

    async fn get_login_status(&self) -> LoginResult<SocialUser>;

    async fn sign_in(&self) -> LoginResult<SocialUser>;

    async fn sign_out(&self) -> LoginResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn social_user_uses_camel_case_keys() {
        let user = SocialUser {
            provider: "TWITCH".into(),
            id: "42".into(),
            photo_url: "https://cdn/pic.png".into(),
            auth_token: "abc".into(),
            ..SocialUser::default()
        };

        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(value["photoUrl"], json!("https://cdn/pic.png"));
        assert_eq!(value["authToken"], json!("abc"));
        assert_eq!(value["idToken"], json!(""));
        assert_eq!(value["authorizationCode"], json!(""));
    }
}

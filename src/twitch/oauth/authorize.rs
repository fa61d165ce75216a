use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use url::Url;

use crate::twitch::config::TwitchInitOptions;
use crate::twitch::constants::DEFAULT_RESPONSE_TYPE;
use crate::twitch::error::{invalid_argument, LoginResult};

/// `encodeURIComponent` keeps `- _ . ! ~ * ' ( )`; query values additionally keep the
/// separators Twitch accepts verbatim, so comma-joined scopes and redirect URIs stay readable.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'@')
    .remove(b':')
    .remove(b'$')
    .remove(b',')
    .remove(b'+')
    .remove(b';')
    .remove(b'=')
    .remove(b'?')
    .remove(b'/');

/// Builds the implicit-grant authorization URL the popup navigates to.
///
/// Pure: identical inputs always give a byte-identical URL. Parameters are emitted in a fixed
/// order (`client_id`, `force_verify`, `redirect_uri`, `response_type`, `scope`).
pub fn build_auth_url(
    authorize_endpoint: &str,
    client_id: &str,
    options: &TwitchInitOptions,
) -> LoginResult<String> {
    Url::parse(authorize_endpoint).map_err(|err| {
        invalid_argument(format!(
            "Invalid authorization endpoint '{authorize_endpoint}': {err}"
        ))
    })?;

    let force_verify = options.force_verify.unwrap_or(false).to_string();
    let response_type = options
        .response_type
        .as_deref()
        .unwrap_or(DEFAULT_RESPONSE_TYPE);
    let scope = options.scopes.to_query_value();

    let params = [
        ("client_id", client_id),
        ("force_verify", force_verify.as_str()),
        ("redirect_uri", options.redirect_uri.as_str()),
        ("response_type", response_type),
        ("scope", scope.as_str()),
    ];
    let query = params
        .iter()
        .map(|(key, value)| format!("{key}={}", utf8_percent_encode(value, QUERY_VALUE)))
        .collect::<Vec<_>>()
        .join("&");

    let separator = if authorize_endpoint.contains('?') { '&' } else { '?' };
    Ok(format!("{authorize_endpoint}{separator}{query}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::twitch::config::Scopes;

    const ENDPOINT: &str = "https://id.twitch.tv/oauth2/authorize";

    #[test]
    fn defaults_are_applied() {
        let options = TwitchInitOptions::new("http://localhost:4200", ["a", "b"]);
        let url = build_auth_url(ENDPOINT, "client", &options).unwrap();
        assert_eq!(
            url,
            "https://id.twitch.tv/oauth2/authorize?client_id=client&force_verify=false\
             &redirect_uri=http://localhost:4200&response_type=token&scope=a,b"
        );
    }

    #[test]
    fn explicit_options_and_single_scope_pass_through() {
        let options = TwitchInitOptions::new("https://app.example/cb?x=1", "user:read:email")
            .with_force_verify(true)
            .with_response_type("token id_token");
        let url = build_auth_url(ENDPOINT, "client", &options).unwrap();
        assert!(url.contains("force_verify=true"));
        assert!(url.contains("redirect_uri=https://app.example/cb?x=1"));
        assert!(url.contains("response_type=token%20id_token"));
        assert!(url.ends_with("scope=user:read:email"));
        assert_eq!(options.scopes, Scopes::Single("user:read:email".into()));
    }

    #[test]
    fn output_is_deterministic() {
        let options = TwitchInitOptions::new("http://localhost", vec!["chat:read", "chat:edit"]);
        let first = build_auth_url(ENDPOINT, "client", &options).unwrap();
        let second = build_auth_url(ENDPOINT, "client", &options.clone()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn reserved_characters_in_values_are_escaped() {
        let options = TwitchInitOptions::new("http://localhost/#frag", "a&b");
        let url = build_auth_url(ENDPOINT, "id with space", &options).unwrap();
        assert!(url.contains("client_id=id%20with%20space"));
        assert!(url.contains("redirect_uri=http://localhost/%23frag"));
        assert!(url.ends_with("scope=a%26b"));
    }

    #[test]
    fn plus_signs_stay_literal() {
        let options = TwitchInitOptions::new("http://localhost/a+b", "chat:read+chat:edit");
        let url = build_auth_url(ENDPOINT, "client", &options).unwrap();
        assert!(url.contains("redirect_uri=http://localhost/a+b&"));
        assert!(url.ends_with("scope=chat:read+chat:edit"));
    }

    #[test]
    fn relative_endpoint_is_rejected() {
        let options = TwitchInitOptions::new("http://localhost", "a");
        assert!(build_auth_url("/oauth2/authorize", "client", &options).is_err());
    }
}

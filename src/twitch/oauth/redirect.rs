use url::form_urlencoded;
use url::Url;

/// What the popup's current location says about the handshake.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RedirectOutcome {
    /// The fragment carried `access_token`.
    Token(String),
    /// The provider reported `error` (and usually `error_description`).
    ProviderError {
        error: String,
        description: Option<String>,
    },
    /// A fragment came back without a token and without an error.
    Malformed,
    /// Nothing conclusive yet; navigation may still be in flight.
    Pending,
}

impl RedirectOutcome {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, RedirectOutcome::Pending)
    }
}

/// Classifies a same-origin popup location returned from the authorize endpoint.
pub fn parse_redirect(location: &Url) -> RedirectOutcome {
    let fragment = location.fragment().filter(|fragment| !fragment.is_empty());

    if let Some(fragment) = fragment {
        if let Some(token) = find_param(fragment, "access_token").filter(|token| !token.is_empty())
        {
            return RedirectOutcome::Token(token);
        }
    }

    let reported = location
        .query()
        .and_then(provider_error)
        .or_else(|| fragment.and_then(provider_error));
    if let Some(outcome) = reported {
        return outcome;
    }

    if fragment.is_some() {
        RedirectOutcome::Malformed
    } else {
        RedirectOutcome::Pending
    }
}

/// An empty `error` value does not count as a reported error.
fn provider_error(params: &str) -> Option<RedirectOutcome> {
    let error = find_param(params, "error").filter(|error| !error.is_empty())?;
    let description = find_param(params, "error_description");
    Some(RedirectOutcome::ProviderError { error, description })
}

fn find_param(encoded: &str, name: &str) -> Option<String> {
    form_urlencoded::parse(encoded.as_bytes())
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

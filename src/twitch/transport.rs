use async_trait::async_trait;
use serde_json::Value;
use url::Url;

use crate::twitch::error::{invalid_argument, transport_failure, LoginResult};
use crate::twitch::LOGGER;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum RequestBody {
    /// Serialized as JSON text.
    Json(Value),
    /// Serialized as `application/x-www-form-urlencoded`.
    Form(Vec<(String, String)>),
}

/// One HTTP call as issued by the login flows.
#[derive(Clone, Debug, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    /// Appended to `url` as a query string before dispatch.
    pub query: Option<Vec<(String, String)>>,
    pub body: Option<RequestBody>,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            query: None,
            body: None,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, url)
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = Some(query);
        self
    }

    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.body = Some(body);
        self
    }

    /// Final URL with the query parameters applied.
    pub fn resolved_url(&self) -> LoginResult<Url> {
        let mut url = Url::parse(&self.url)
            .map_err(|err| invalid_argument(format!("Invalid request URL '{}': {err}", self.url)))?;
        if let Some(query) = &self.query {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }
}

/// Executes a single HTTP attempt and resolves with the parsed response body.
///
/// Statuses in `[200, 300)` resolve; anything else, and network-level failures, reject with
/// [`crate::twitch::LoginErrorCode::TransportFailure`]. Implementations never retry and never
/// impose a timeout.
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> LoginResult<Value>;
}

#[derive(Clone, Debug, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    fn prepare(&self, request: HttpRequest) -> LoginResult<reqwest::RequestBuilder> {
        let url = request.resolved_url()?;
        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(url),
            HttpMethod::Post => self.client.post(url),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder = match request.body {
            Some(RequestBody::Json(body)) => builder
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(body.to_string()),
            Some(RequestBody::Form(pairs)) => builder.form(&pairs),
            None => builder,
        };
        Ok(builder)
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> LoginResult<Value> {
        let method = request.method;
        let target = request.url.clone();
        let builder = self.prepare(request)?;

        let response = builder.send().await.map_err(|err| {
            LOGGER.debug(format!(
                "{} {target} failed before a response: {err}",
                method.as_str()
            ));
            transport_failure(format!("Request failed: {err}"))
        })?;

        let status = response.status();
        if !status.is_success() {
            LOGGER.debug(format!("{} {target} returned {status}", method.as_str()));
            return Err(
                transport_failure(format!("Request failed with status {}", status.as_u16()))
                    .with_status(status.as_u16()),
            );
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|err| transport_failure(format!("Request failed: {err}")))?;
        Ok(parse_body(&bytes))
    }
}

fn parse_body(bytes: &[u8]) -> Value {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Value::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use crate::test_support::start_mock_server;
    use crate::twitch::error::LoginErrorCode;
    use httpmock::prelude::*;
    use serde_json::json;

    #[test]
    fn query_is_appended_to_existing_url() {
        let request = HttpRequest::get("https://example.com/path?a=1")
            .with_query(vec![("b".into(), "two words".into())]);
        assert_eq!(
            request.resolved_url().unwrap().as_str(),
            "https://example.com/path?a=1&b=two+words"
        );
        assert_eq!(
            HttpRequest::get("not a url").resolved_url().unwrap_err().code,
            LoginErrorCode::InvalidArgument
        );
    }

    #[test]
    fn body_parsing_tolerates_empty_and_plain_text() {
        assert_eq!(parse_body(b""), Value::Null);
        assert_eq!(parse_body(b"  \n"), Value::Null);
        assert_eq!(parse_body(br#"{"ok":true}"#), json!({"ok": true}));
        assert_eq!(parse_body(b"revoked"), Value::String("revoked".into()));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn success_resolves_with_parsed_json_and_sends_headers() {
        let server = start_mock_server();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/users")
                .query_param("login", "someone")
                .header("Client-Id", "client");
            then.status(200).json_body(json!({"data": []}));
        });

        let transport = ReqwestTransport::default();
        let body = transport
            .send(
                HttpRequest::get(server.url("/users"))
                    .with_header("Client-Id", "client")
                    .with_query(vec![("login".into(), "someone".into())]),
            )
            .await
            .expect("request should succeed");

        mock.assert();
        assert_eq!(body, json!({"data": []}));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn non_success_status_rejects_with_status() {
        let server = start_mock_server();
        server.mock(|when, then| {
            when.method(GET).path("/validate");
            then.status(401)
                .json_body(json!({"status": 401, "message": "invalid access token"}));
        });

        let err = ReqwestTransport::default()
            .send(HttpRequest::get(server.url("/validate")))
            .await
            .unwrap_err();

        assert_eq!(err.code, LoginErrorCode::TransportFailure);
        assert_eq!(err.status(), Some(401));
        assert!(err.message().contains("Request failed with status 401"));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn form_and_json_bodies_are_encoded() {
        let server = start_mock_server();
        let form = server.mock(|when, then| {
            when.method(POST)
                .path("/revoke")
                .header("content-type", "application/x-www-form-urlencoded")
                .body("client_id=client&token=abc");
            then.status(200);
        });
        let json_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/echo")
                .header("content-type", "application/json")
                .json_body(json!({"hello": "world"}));
            then.status(201).body("");
        });

        let transport = ReqwestTransport::default();
        let revoked = transport
            .send(HttpRequest::post(server.url("/revoke")).with_body(RequestBody::Form(vec![
                ("client_id".into(), "client".into()),
                ("token".into(), "abc".into()),
            ])))
            .await
            .unwrap();
        let echoed = transport
            .send(
                HttpRequest::post(server.url("/echo"))
                    .with_body(RequestBody::Json(json!({"hello": "world"}))),
            )
            .await
            .unwrap();

        form.assert();
        json_mock.assert();
        assert_eq!(revoked, Value::Null);
        assert_eq!(echoed, Value::Null);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn network_failure_rejects_without_status() {
        let err = ReqwestTransport::default()
            .send(HttpRequest::get("http://127.0.0.1:1/unreachable"))
            .await
            .unwrap_err();
        assert_eq!(err.code, LoginErrorCode::TransportFailure);
        assert_eq!(err.status(), None);
        assert!(err.message().starts_with("Request failed"));
    }
}

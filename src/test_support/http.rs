use httpmock::MockServer;

use crate::twitch::TwitchEndpoints;

/// Start a fresh `httpmock::MockServer` instance for use in unit tests.
pub fn start_mock_server() -> MockServer {
    MockServer::start()
}

/// Endpoints rooted at `server`, keeping the `/oauth2` and `/helix` path prefixes.
pub fn mock_endpoints(server: &MockServer) -> TwitchEndpoints {
    TwitchEndpoints::from_base_urls(&server.url("/oauth2"), &server.url("/helix"))
}

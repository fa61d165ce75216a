//! Test utilities shared across crate-level unit tests.

#[cfg(not(target_arch = "wasm32"))]
pub mod http;
pub mod popup;

#[cfg(not(target_arch = "wasm32"))]
pub use http::{mock_endpoints, start_mock_server};

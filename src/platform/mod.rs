//! Platform glue shared by the login flows.

#[cfg(all(target_arch = "wasm32", feature = "wasm-web"))]
pub mod browser;
pub mod runtime;

#![doc = include_str!("RUSTDOC.md")]

#[cfg(all(target_arch = "wasm32", not(feature = "wasm-web")))]
compile_error!("building for wasm32 requires the `wasm-web` feature");

pub mod logger;
pub mod platform;
pub mod twitch;

#[cfg(test)]
pub mod test_support;

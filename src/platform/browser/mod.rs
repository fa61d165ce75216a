//! Browser bindings used when compiled for `wasm32` with the `wasm-web` feature.

pub mod popup;

use wasm_bindgen::{JsCast, JsValue};

/// Best-effort text for a thrown JS value (`DOMException`s become `"Name: message"`).
pub fn stringify_js_error(value: &JsValue) -> String {
    if let Some(exception) = value.dyn_ref::<web_sys::DomException>() {
        format!("{}: {}", exception.name(), exception.message())
    } else if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        String::from(error.to_string())
    } else if let Some(text) = value.as_string() {
        text
    } else {
        format!("{value:?}")
    }
}

pub(crate) fn is_security_error(value: &JsValue) -> bool {
    value
        .dyn_ref::<web_sys::DomException>()
        .map(|exception| exception.name() == "SecurityError")
        .unwrap_or(false)
}

use std::time::Duration;

/// Asynchronously waits for the provided duration in a platform-compatible way.
///
/// The popup handshake suspends here between ticks, so it must never block the host thread:
/// on native targets this is a tokio timer, in the browser a `setTimeout`-backed future.
pub async fn sleep(duration: Duration) {
    if duration.is_zero() {
        return;
    }

    sleep_impl(duration).await;
}

#[cfg(target_arch = "wasm32")]
async fn sleep_impl(duration: Duration) {
    use gloo_timers::future::sleep;
    sleep(duration).await;
}

#[cfg(not(target_arch = "wasm32"))]
async fn sleep_impl(duration: Duration) {
    use tokio::time::sleep;
    sleep(duration).await;
}

/// Monotonic-ish clock used to bound the popup handshake.
#[cfg(not(target_arch = "wasm32"))]
pub fn now_millis() -> u64 {
    use std::sync::LazyLock;
    use std::time::Instant;

    static START: LazyLock<Instant> = LazyLock::new(Instant::now);
    START.elapsed().as_millis() as u64
}

/// Monotonic-ish clock used to bound the popup handshake.
#[cfg(target_arch = "wasm32")]
pub fn now_millis() -> u64 {
    js_sys::Date::now() as u64
}

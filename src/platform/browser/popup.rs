use web_sys::Window;

use crate::platform::browser::{is_security_error, stringify_js_error};
use crate::twitch::error::{popup_failure, LoginResult};
use crate::twitch::oauth::{
    PopupAccessError, PopupFeatures, PopupOpener, PopupWindow, ScreenGeometry,
};
use crate::twitch::LOGGER;

/// Opens real browser popups from the current `window`.
#[derive(Clone, Debug)]
pub struct WebPopupOpener {
    window: Window,
}

// wasm32 runs single-threaded; the handle never leaves the thread that created it.
unsafe impl Send for WebPopupOpener {}
unsafe impl Sync for WebPopupOpener {}

impl WebPopupOpener {
    pub fn new(window: Window) -> Self {
        Self { window }
    }

    /// `None` outside a window context (workers, node).
    pub fn from_global() -> Option<Self> {
        web_sys::window().map(Self::new)
    }
}

impl PopupOpener for WebPopupOpener {
    fn screen(&self) -> ScreenGeometry {
        let (width, height) = self
            .window
            .screen()
            .and_then(|screen| Ok((screen.width()?, screen.height()?)))
            .unwrap_or((0, 0));
        ScreenGeometry {
            width: width.max(0) as u32,
            height: height.max(0) as u32,
        }
    }

    fn host_origin(&self) -> LoginResult<String> {
        self.window
            .location()
            .origin()
            .map_err(|err| popup_failure(&stringify_js_error(&err)))
    }

    fn open(
        &self,
        url: &str,
        name: &str,
        features: &PopupFeatures,
    ) -> LoginResult<Option<Box<dyn PopupWindow>>> {
        match self.window.open_with_url_and_target_and_features(
            url,
            name,
            &features.to_feature_string(),
        ) {
            Ok(Some(popup)) => Ok(Some(Box::new(WebPopupWindow { popup }))),
            Ok(None) => Ok(None),
            Err(err) => {
                LOGGER.warn(format!("window.open failed: {}", stringify_js_error(&err)));
                Ok(None)
            }
        }
    }
}

struct WebPopupWindow {
    popup: Window,
}

unsafe impl Send for WebPopupWindow {}
unsafe impl Sync for WebPopupWindow {}

impl PopupWindow for WebPopupWindow {
    fn is_closed(&self) -> bool {
        self.popup.closed().unwrap_or(true)
    }

    fn location(&self) -> Result<String, PopupAccessError> {
        self.popup.location().href().map_err(|err| {
            if is_security_error(&err) {
                PopupAccessError::CrossOrigin(stringify_js_error(&err))
            } else {
                PopupAccessError::from_message(stringify_js_error(&err))
            }
        })
    }

    fn close(&self) {
        if let Err(err) = self.popup.close() {
            LOGGER.debug(format!(
                "closing the Twitch popup failed: {}",
                stringify_js_error(&err)
            ));
        }
    }
}

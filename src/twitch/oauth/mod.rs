pub mod authorize;
pub mod popup;
pub mod redirect;

pub use authorize::build_auth_url;
pub use popup::{
    HandshakeSession, HandshakeState, PopupAccessError, PopupFeatures, PopupOpener, PopupWindow,
    ScreenGeometry,
};
pub use redirect::{parse_redirect, RedirectOutcome};

//! Session context shared by every view.
//!
//! Created once in `App`; the cookie is only consulted when the context
//! initialises and when the user logs out.

use crate::browser;
use dioxus::prelude::*;
use tracing::{info, warn};
use wasm_bindgen::JsCast;
use web_sys::HtmlDocument;
use worksite_core::session::{CookieJar, SessionError};
use worksite_core::{AppConfig, SessionState, SessionStore};

/// `document.cookie` backed jar.
pub struct BrowserCookieJar;

impl BrowserCookieJar {
    fn document() -> Result<HtmlDocument, SessionError> {
        web_sys::window()
            .and_then(|window| window.document())
            .and_then(|document| document.dyn_into::<HtmlDocument>().ok())
            .ok_or_else(|| SessionError::JarUnavailable("no html document".to_string()))
    }
}

impl CookieJar for BrowserCookieJar {
    fn read(&self) -> Result<String, SessionError> {
        Self::document()?
            .cookie()
            .map_err(|e| SessionError::JarUnavailable(format!("{e:?}")))
    }

    fn write(&self, line: &str) -> Result<(), SessionError> {
        Self::document()?
            .set_cookie(line)
            .map_err(|e| SessionError::JarUnavailable(format!("{e:?}")))
    }
}

fn session_store() -> SessionStore<BrowserCookieJar> {
    let config = consume_context::<AppConfig>();
    SessionStore::new(BrowserCookieJar, config.session)
}

#[derive(Clone, Copy, PartialEq)]
pub struct SessionContext {
    state: Signal<SessionState>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self {
            state: Signal::new(SessionState::Loading),
        }
    }

    pub fn state(&self) -> SessionState {
        (self.state)()
    }

    /// Stores a redirect `code` if the app was entered with one, strips it
    /// from the address bar, then resolves the tri-state from the cookie.
    pub fn initialize(&mut self) {
        let store = session_store();
        let search = browser::location_search().unwrap_or_default();

        match store.capture_redirect_code(&search) {
            Ok(Some(_)) => {
                let path = browser::location_pathname().unwrap_or_else(|_| "/".to_string());
                // Landing on the login page with a fresh code goes home.
                let clean = if path == "/login" { "/".to_string() } else { path };
                if let Err(e) = browser::replace_url(&clean) {
                    warn!(error = %e, "Failed to strip authorization code from URL");
                }
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, "Failed to store session credential"),
        }

        let state = store.state();
        info!(?state, "Session resolved");
        self.state.set(state);
    }

    /// Drops the credential; the caller navigates to the login view.
    pub fn logout(&mut self) {
        if let Err(e) = session_store().clear_session() {
            warn!(error = %e, "Failed to clear session cookie");
        }
        info!("Logged out");
        self.state.set(SessionState::Unauthenticated);
    }
}

pub fn use_session() -> SessionContext {
    use_context::<SessionContext>()
}

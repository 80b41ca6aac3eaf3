//! Session credential persistence.
//!
//! The identity provider's authorization `code` is the only credential the
//! app holds. It lives verbatim in a single cookie with a fixed expiry.

use crate::config::SessionConfig;
use mockall::automock;
use thiserror::Error;
use tracing::{debug, info, warn};
use url::form_urlencoded;

const CODE_PARAM: &str = "code";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    #[error("Cookie jar unavailable: {0}")]
    JarUnavailable(String),
}

/// Raw access to the document's cookie string.
#[automock]
pub trait CookieJar {
    /// All cookies as `name=value` pairs joined by `"; "`.
    fn read(&self) -> Result<String, SessionError>;
    /// Writes a single `Set-Cookie`-style line.
    fn write(&self, line: &str) -> Result<(), SessionError>;
}

/// Opaque bearer credential issued by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Whether the visitor is logged in, as seen by the route guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Loading,
    Authenticated,
    Unauthenticated,
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated)
    }
}

pub struct SessionStore<J: CookieJar> {
    jar: J,
    config: SessionConfig,
}

impl<J: CookieJar> SessionStore<J> {
    pub fn new(jar: J, config: SessionConfig) -> Self {
        Self { jar, config }
    }

    /// True when the session cookie is present. A jar that cannot be read
    /// counts as no session.
    pub fn has_session(&self) -> bool {
        let prefix = format!("{}=", self.config.cookie_name);
        match self.jar.read() {
            Ok(cookies) => cookies.split("; ").any(|row| row.starts_with(&prefix)),
            Err(e) => {
                debug!(error = %e, "Cookie jar unreadable, treating as logged out");
                false
            }
        }
    }

    pub fn set_session(&self, token: &SessionToken) -> Result<(), SessionError> {
        let line = format!(
            "{}={}; path=/; max-age={}; SameSite=Lax",
            self.config.cookie_name,
            token.as_str(),
            self.config.max_age_secs
        );
        self.jar.write(&line)
    }

    pub fn clear_session(&self) -> Result<(), SessionError> {
        let line = format!("{}=; path=/; max-age=0", self.config.cookie_name);
        self.jar.write(&line)
    }

    pub fn state(&self) -> SessionState {
        if self.has_session() {
            SessionState::Authenticated
        } else {
            SessionState::Unauthenticated
        }
    }

    /// Persists the redirect `code` found in `search`, if any, and returns
    /// it. The caller is responsible for stripping it from the visible URL.
    pub fn capture_redirect_code(&self, search: &str) -> Result<Option<SessionToken>, SessionError> {
        let Some(code) = extract_code_from_location(search) else {
            return Ok(None);
        };
        let token = SessionToken::new(code);
        self.set_session(&token)?;
        info!("Stored session credential from identity provider redirect");
        Ok(Some(token))
    }
}

/// Pulls the authorization `code` out of a location query string such as
/// `?code=abc&state=xyz`. Empty codes are ignored, and so are codes that
/// could not be stored verbatim as a cookie value.
pub fn extract_code_from_location(search: &str) -> Option<String> {
    let query = search.strip_prefix('?').unwrap_or(search);
    let code = form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == CODE_PARAM)
        .map(|(_, value)| value.into_owned())
        .filter(|code| !code.is_empty())?;
    if !code.chars().all(is_cookie_octet) {
        warn!("Ignoring redirect code with characters not allowed in a cookie");
        return None;
    }
    Some(code)
}

/// Printable ASCII except whitespace, `"`, `,`, `;` and `\`.
fn is_cookie_octet(c: char) -> bool {
    c.is_ascii_graphic() && !matches!(c, '"' | ',' | ';' | '\\')
}

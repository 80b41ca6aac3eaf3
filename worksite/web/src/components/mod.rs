mod error_message;
mod loading_spinner;
mod navbar;
mod require_session;

pub use error_message::ErrorMessage;
pub use loading_spinner::LoadingSpinner;
pub use navbar::NavBar;
pub use require_session::RequireSession;

use crate::browser;
use crate::components::ErrorMessage;
use crate::session::use_session;
use crate::Route;
use dioxus::prelude::*;
use tracing::error;
use worksite_core::{AppConfig, SessionState};

#[component]
pub fn Login() -> Element {
    let session = use_session();
    let config = use_context::<AppConfig>();
    let nav = navigator();
    let mut error = use_signal(|| None::<String>);

    use_effect(move || {
        if session.state() == SessionState::Authenticated {
            nav.replace(Route::Home {});
        }
    });

    let handle_login = move |_| {
        if let Err(e) = browser::redirect_external(&config.identity.login_url) {
            error!(error = %e, "Failed to open the login page");
            error.set(Some("Could not open the login page. Please try again.".to_string()));
        }
    };

    rsx! {
        main { class: "min-h-screen bg-gray-50 py-16",
            div { class: "max-w-md mx-auto px-6 text-center space-y-6",
                h1 { class: "text-3xl font-bold text-gray-900", "Welcome to the Worksite" }
                p { class: "text-gray-600", "Sign in to upload or authenticate a photo." }
                if let Some(message) = error() {
                    ErrorMessage { message }
                }
                button {
                    class: "bg-blue-600 text-white px-6 py-3 rounded-lg hover:bg-blue-700 transition-colors font-medium",
                    onclick: handle_login,
                    "Login"
                }
            }
        }
    }
}

use crate::components::LoadingSpinner;
use crate::session::use_session;
use crate::Route;
use dioxus::prelude::*;
use worksite_core::SessionState;

/// Guards every protected page. Nothing protected renders until the session
/// has been resolved; without one the visitor is sent to the login page.
#[component]
pub fn RequireSession() -> Element {
    let session = use_session();
    let nav = navigator();

    use_effect(move || {
        if session.state() == SessionState::Unauthenticated {
            nav.replace(Route::Login {});
        }
    });

    match session.state() {
        SessionState::Authenticated => rsx! { Outlet::<Route> {} },
        SessionState::Loading => rsx! {
            LoadingSpinner { message: "Checking your session...".to_string() }
        },
        SessionState::Unauthenticated => rsx! {},
    }
}

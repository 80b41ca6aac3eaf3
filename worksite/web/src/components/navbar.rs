use crate::session::use_session;
use crate::Route;
use dioxus::prelude::*;

/// Top navigation shared by every page. Account actions only appear once a
/// session exists.
#[component]
pub fn NavBar() -> Element {
    let mut session = use_session();
    let nav = navigator();

    let handle_logout = move |_| {
        session.logout();
        nav.push(Route::Login {});
    };

    rsx! {
        nav { class: "bg-slate-800 text-white",
            div { class: "max-w-5xl mx-auto px-6 py-3 flex items-center justify-between",
                Link { class: "text-lg font-semibold", to: Route::Home {}, "🏢 Worksite Auth" }
                div { class: "flex items-center space-x-4 text-sm",
                    Link { class: "hover:text-blue-300", to: Route::Home {}, "Home" }
                    if session.state().is_authenticated() {
                        Link { class: "hover:text-blue-300", to: Route::FacialUpload {}, "Upload Photo" }
                        Link { class: "hover:text-blue-300", to: Route::FacialAuth {}, "Authenticate" }
                        button {
                            class: "bg-red-600 px-3 py-1 rounded hover:bg-red-700 transition-colors",
                            onclick: handle_logout,
                            "Logout"
                        }
                    }
                }
            }
        }
        Outlet::<Route> {}
    }
}

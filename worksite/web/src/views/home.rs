use crate::browser;
use crate::components::ErrorMessage;
use crate::Route;
use dioxus::prelude::*;
use tracing::error;
use worksite_core::AppConfig;

/// Landing page once signed in.
#[component]
pub fn Home() -> Element {
    let config = use_context::<AppConfig>();
    let nav = navigator();
    let mut error = use_signal(|| None::<String>);

    // Enrolment goes through the provider again so the photo is tied to a
    // fresh sign-in; it lands back on /facial-upload.
    let handle_upload = move |_| {
        if let Err(e) = browser::redirect_external(&config.identity.upload_url) {
            error!(error = %e, "Failed to open the upload login page");
            error.set(Some("Could not open the upload page. Please try again.".to_string()));
        }
    };

    rsx! {
        main { class: "min-h-screen bg-gray-50 py-16",
            div { class: "max-w-xl mx-auto px-6 text-center space-y-6",
                h1 { class: "text-4xl font-bold text-gray-900", "Worksite Facial Authentication" }
                p { class: "text-lg text-gray-600",
                    "Enrol a reference photo or authenticate to access the worksite."
                }
                if let Some(message) = error() {
                    ErrorMessage { message }
                }
                div { class: "flex justify-center space-x-4",
                    button {
                        class: "bg-blue-600 text-white px-6 py-3 rounded-lg hover:bg-blue-700 transition-colors",
                        onclick: handle_upload,
                        "Upload Image"
                    }
                    button {
                        class: "bg-green-600 text-white px-6 py-3 rounded-lg hover:bg-green-700 transition-colors",
                        onclick: move |_| { nav.push(Route::FacialAuth {}); },
                        "Authenticate Image"
                    }
                }
            }
        }
    }
}

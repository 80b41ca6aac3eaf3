use crate::Route;
use dioxus::prelude::*;

#[component]
pub fn NotFound(route: Vec<String>) -> Element {
    let path = route.join("/");

    rsx! {
        main { class: "min-h-screen bg-gray-50 py-16",
            div { class: "max-w-xl mx-auto px-6 text-center space-y-4",
                h1 { class: "text-4xl font-bold text-gray-900", "Page not found" }
                p { class: "text-gray-600", "There is nothing at /{path}." }
                Link { class: "text-blue-600 hover:underline", to: Route::Home {}, "Back to home" }
            }
        }
    }
}

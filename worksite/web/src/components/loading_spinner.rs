use dioxus::prelude::*;

#[component]
pub fn LoadingSpinner(message: Option<String>) -> Element {
    let message = message.unwrap_or_else(|| "Please wait...".to_string());

    rsx! {
        div { class: "flex flex-col items-center py-8", aria_live: "polite",
            div { class: "animate-spin rounded-full h-8 w-8 border-4 border-blue-200 border-t-blue-600" }
            p { class: "mt-3 text-sm text-gray-600", "{message}" }
        }
    }
}

use dioxus::prelude::*;

/// Inline alert for a failed action. The page stays usable underneath.
#[component]
pub fn ErrorMessage(message: String) -> Element {
    rsx! {
        div {
            role: "alert",
            class: "flex items-center justify-center space-x-2 bg-red-50 border border-red-200 rounded-lg px-4 py-3",
            span { "⚠️" }
            p { class: "text-red-700 text-sm", "{message}" }
        }
    }
}

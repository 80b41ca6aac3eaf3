use crate::identity::IdentityQuery;
use crate::Route;
use dioxus::prelude::*;

#[component]
pub fn Welcome(identity: IdentityQuery) -> Element {
    let greeting = match &identity.0 {
        Some(identity) => format!("Welcome, {identity}!"),
        None => "Welcome!".to_string(),
    };

    rsx! {
        main { class: "min-h-screen bg-gray-50 py-16",
            div { class: "max-w-xl mx-auto px-6 text-center space-y-6",
                h1 { class: "text-4xl font-bold text-gray-900", "{greeting}" }
                p { class: "text-gray-600", "You have been verified for worksite access." }
                if identity.0.is_some() {
                    Link {
                        class: "text-blue-600 hover:underline",
                        to: Route::Tasks { identity: identity.clone() },
                        "Go to your tasks"
                    }
                }
            }
        }
    }
}

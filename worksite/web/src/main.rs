use dioxus::prelude::*;
use tracing::{error, Level};
use worksite_core::AppConfig;

mod api;
mod browser;
mod camera;
mod components;
mod identity;
mod session;
mod state;
mod teardown;
mod views;

use components::{NavBar, RequireSession};
use identity::IdentityQuery;
use views::{FacialAuth, FacialUpload, Home, IssueBoard, Login, NotFound, Tasks, Welcome};

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[layout(NavBar)]
        #[route("/login")]
        Login {},
        #[layout(RequireSession)]
            #[route("/")]
            Home {},
            #[route("/facial-auth")]
            FacialAuth {},
            #[route("/facial-upload")]
            FacialUpload {},
            #[route("/welcome?:..identity")]
            Welcome { identity: IdentityQuery },
            #[route("/todo?:..identity")]
            Tasks { identity: IdentityQuery },
            #[route("/board?:..identity")]
            IssueBoard { identity: IdentityQuery },
        #[end_layout]
    #[end_layout]
    #[route("/:..route")]
    NotFound { route: Vec<String> },
}

const TAILWIND_CSS: Asset = asset!("/assets/tailwind.css");

fn main() {
    if let Err(e) = dioxus::logger::init(Level::INFO) {
        eprintln!("failed to initialise logger: {e}");
    }

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid application configuration");
            return;
        }
    };

    dioxus::LaunchBuilder::new().with_context(config).launch(App);
}

/// Root component. Captures the identity provider redirect and resolves the
/// session once, before any protected view decides what to render.
#[component]
fn App() -> Element {
    let mut session = use_context_provider(session::SessionContext::new);

    use_effect(move || session.initialize());

    rsx! {
        document::Link { rel: "stylesheet", href: TAILWIND_CSS }
        Router::<Route> {}
    }
}

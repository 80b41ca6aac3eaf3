use super::components::{CaptureFrame, CaptureStatus};
use super::use_capture;
use crate::api::HttpFaceApi;
use crate::teardown::use_teardown;
use crate::Route;
use dioxus::prelude::*;
use tracing::{error, info};
use worksite_core::capture::IDLE_PROMPT;
use worksite_core::submission::{authenticate, AUTHENTICATION_FAILED, NOT_AUTHORIZED};
use worksite_core::{AppConfig, AuthOutcome, CaptureState};

/// Captures a visitor's face and checks it against enrolled employees.
#[component]
pub fn FacialAuth() -> Element {
    let mut capture = use_capture(|| true);
    let teardown = use_teardown();
    let config = use_context::<AppConfig>();
    let api = use_hook(move || HttpFaceApi::new(config.endpoints));
    let nav = navigator();

    let handle_upload = move |_| {
        let Some(image) = capture.begin_upload() else {
            return;
        };
        let api = api.clone();
        teardown.spawn("authenticate", async move {
            match authenticate(&api, image).await {
                Ok(AuthOutcome::Authorized(identity)) => {
                    info!(%identity, "Visitor authorized");
                    capture.finish(Ok(format!("Welcome, {identity}!")));
                    nav.push(Route::Tasks {
                        identity: identity.into(),
                    });
                }
                Ok(AuthOutcome::NotAuthorized { status }) => {
                    info!(status, "Visitor not authorized");
                    capture.finish(Err(NOT_AUTHORIZED.to_string()));
                }
                Err(e) => {
                    error!(error = %e, "Authentication failed");
                    capture.finish(Err(AUTHENTICATION_FAILED.to_string()));
                }
            }
        });
    };

    let workflow = capture.workflow.read();
    let state = workflow.state().clone();
    let status = workflow.status_message(IDLE_PROMPT).to_string();
    let preview = workflow.preview().map(|image| image.to_data_url());
    drop(workflow);

    rsx! {
        main { class: "min-h-screen bg-gray-50 py-8",
            div { class: "max-w-2xl mx-auto px-6",
                h1 { class: "text-3xl font-bold text-gray-900 mb-6 text-center", "Facial Authentication" }
                div { class: "bg-white rounded-lg shadow p-6",
                    CaptureFrame {
                        preview,
                        camera_error: capture.camera_error(),
                        disabled: !matches!(state, CaptureState::Idle | CaptureState::CameraActive),
                        on_file: move |file| capture.accept_file(file),
                    }
                    CaptureStatus { message: status }
                    div { class: "flex justify-center space-x-3",
                        match state {
                            CaptureState::CameraActive => rsx! {
                                button {
                                    class: "bg-blue-600 text-white px-4 py-2 rounded hover:bg-blue-700",
                                    onclick: move |_| capture.capture(),
                                    "Capture"
                                }
                            },
                            CaptureState::Captured(_) => rsx! {
                                button {
                                    class: "bg-green-600 text-white px-4 py-2 rounded hover:bg-green-700",
                                    onclick: handle_upload,
                                    "Upload"
                                }
                                button {
                                    class: "border border-gray-300 text-gray-700 px-4 py-2 rounded hover:bg-gray-50",
                                    onclick: move |_| capture.reset(),
                                    "Reset"
                                }
                            },
                            CaptureState::Uploading(_) => rsx! {
                                button { class: "bg-green-600 text-white px-4 py-2 rounded opacity-50", disabled: true, "Uploading..." }
                            },
                            CaptureState::Done | CaptureState::Failed => rsx! {
                                button {
                                    class: "border border-gray-300 text-gray-700 px-4 py-2 rounded hover:bg-gray-50",
                                    onclick: move |_| capture.reset(),
                                    "Try Again"
                                }
                            },
                            CaptureState::Idle => rsx! {},
                        }
                    }
                }
            }
        }
    }
}

use super::components::{CaptureFrame, CaptureStatus};
use super::use_capture;
use crate::api::HttpFaceApi;
use crate::teardown::use_teardown;
use crate::Route;
use dioxus::prelude::*;
use tracing::error;
use worksite_core::submission::{enroll, upload_success_message, MISSING_NAMES, UPLOAD_FAILED};
use worksite_core::{AppConfig, CaptureState, SubmissionError};

const UPLOAD_PROMPT: &str = "Please enter your details and capture an image to authenticate.";

/// Enrols an employee reference photo under their name.
#[component]
pub fn FacialUpload() -> Element {
    let mut first_name = use_signal(String::new);
    let mut last_name = use_signal(String::new);
    // The camera only starts once both names are filled in.
    let mut capture =
        use_capture(move || !first_name().trim().is_empty() && !last_name().trim().is_empty());
    let teardown = use_teardown();
    let config = use_context::<AppConfig>();
    let api = use_hook(move || HttpFaceApi::new(config.endpoints));
    let nav = navigator();

    let handle_upload = move |_| {
        let (first, last) = (first_name(), last_name());
        if first.trim().is_empty() || last.trim().is_empty() {
            capture.set_notice(MISSING_NAMES);
            return;
        }
        let Some(image) = capture.begin_upload() else {
            return;
        };
        let api = api.clone();
        teardown.spawn("enroll", async move {
            let outcome = match enroll(&api, &first, &last, image).await {
                Ok(key) => Ok(upload_success_message(&key)),
                Err(SubmissionError::MissingName) => Err(MISSING_NAMES.to_string()),
                Err(e) => {
                    error!(error = %e, "Enrolment failed");
                    Err(UPLOAD_FAILED.to_string())
                }
            };
            capture.finish(outcome);
        });
    };

    let handle_another = move |_| {
        first_name.set(String::new());
        last_name.set(String::new());
        capture.reset();
    };

    let workflow = capture.workflow.read();
    let state = workflow.state().clone();
    let status = workflow.status_message(UPLOAD_PROMPT).to_string();
    let preview = workflow.preview().map(|image| image.to_data_url());
    drop(workflow);

    let editable = matches!(state, CaptureState::Idle | CaptureState::CameraActive | CaptureState::Captured(_));
    let input_class = "w-full px-4 py-2 border border-gray-300 rounded-lg focus:ring-2 focus:ring-blue-500 focus:border-transparent";

    rsx! {
        main { class: "min-h-screen bg-gray-50 py-8",
            div { class: "max-w-2xl mx-auto px-6",
                h1 { class: "text-3xl font-bold text-gray-900 mb-6 text-center", "Upload Employee Photo" }
                div { class: "bg-white rounded-lg shadow p-6 space-y-4",
                    div { class: "grid grid-cols-2 gap-3",
                        input {
                            r#type: "text",
                            placeholder: "First name",
                            class: input_class,
                            value: "{first_name}",
                            disabled: !editable,
                            oninput: move |evt| first_name.set(evt.value()),
                        }
                        input {
                            r#type: "text",
                            placeholder: "Last name",
                            class: input_class,
                            value: "{last_name}",
                            disabled: !editable,
                            oninput: move |evt| last_name.set(evt.value()),
                        }
                    }
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
                            CaptureState::Done => rsx! {
                                button {
                                    class: "bg-blue-600 text-white px-4 py-2 rounded hover:bg-blue-700",
                                    onclick: move |_| { nav.push(Route::Home {}); },
                                    "Home Page"
                                }
                                button {
                                    class: "border border-gray-300 text-gray-700 px-4 py-2 rounded hover:bg-gray-50",
                                    onclick: handle_another,
                                    "Add Another Image"
                                }
                            },
                            CaptureState::Failed => rsx! {
                                button {
                                    class: "border border-gray-300 text-gray-700 px-4 py-2 rounded hover:bg-gray-50",
                                    onclick: move |_| capture.reset(),
                                    "Reset"
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

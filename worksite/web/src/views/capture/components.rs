use super::PickedFile;
use crate::camera::PREVIEW_ID;
use dioxus::html::{FileEngine, HasFileData};
use dioxus::prelude::*;
use std::sync::Arc;
use tracing::debug;

/// Live camera feed, or the captured image once there is one. Images can be
/// dropped onto the frame or picked from the device instead.
#[component]
pub fn CaptureFrame(
    preview: Option<String>,
    camera_error: Option<String>,
    disabled: bool,
    on_file: EventHandler<PickedFile>,
) -> Element {
    let mut dragging = use_signal(|| false);

    let handle_drop = move |evt: DragEvent| {
        evt.prevent_default();
        dragging.set(false);
        if disabled {
            return;
        }
        spawn(async move {
            if let Some(file) = first_file(evt.files()).await {
                on_file.call(file);
            }
        });
    };

    let handle_pick = move |evt: FormEvent| {
        spawn(async move {
            if let Some(file) = first_file(evt.files()).await {
                on_file.call(file);
            }
        });
    };

    let border = if dragging() {
        "border-blue-500 bg-blue-50"
    } else {
        "border-gray-300 bg-gray-100"
    };

    rsx! {
        div {
            class: "relative w-full aspect-video rounded-lg border-2 border-dashed overflow-hidden flex items-center justify-center {border}",
            ondragover: move |evt| {
                evt.prevent_default();
                dragging.set(true);
            },
            ondragleave: move |_| dragging.set(false),
            ondrop: handle_drop,

            if let Some(src) = preview {
                img { class: "w-full h-full object-contain", src: "{src}", alt: "Captured image" }
            } else {
                video {
                    id: PREVIEW_ID,
                    class: "w-full h-full object-cover",
                    autoplay: true,
                    playsinline: true,
                    muted: true,
                }
                if let Some(message) = camera_error {
                    p { class: "absolute inset-x-0 bottom-0 bg-black bg-opacity-60 text-white text-sm p-2 text-center",
                        "{message}"
                    }
                }
            }
        }
        label { class: "block mt-3 text-sm text-gray-600",
            "Or choose an image: "
            input {
                r#type: "file",
                accept: "image/*",
                disabled,
                onchange: handle_pick,
            }
        }
    }
}

/// Shows the workflow's status line.
#[component]
pub fn CaptureStatus(message: String) -> Element {
    rsx! {
        p { class: "text-center text-gray-700 my-4", "{message}" }
    }
}

async fn first_file(engine: Option<Arc<dyn FileEngine>>) -> Option<PickedFile> {
    let engine = engine?;
    let name = engine.files().into_iter().next()?;
    // The native handle carries the browser-reported media type.
    let media_type = engine
        .get_native_file(&name)
        .await
        .and_then(|native| native.downcast::<web_sys::File>().ok())
        .map(|file| file.type_())
        .unwrap_or_default();
    let bytes = engine.read_file(&name).await?;
    debug!(%name, %media_type, bytes = bytes.len(), "Read picked file");
    Some(PickedFile { media_type, bytes })
}

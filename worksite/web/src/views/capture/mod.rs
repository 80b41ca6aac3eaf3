//! Camera capture and drag-and-drop shared by the authentication and
//! enrolment views.

use crate::camera::Camera;
use dioxus::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, error, info, warn};
use worksite_core::{CaptureWorkflow, CapturedImage};

mod auth;
mod components;
mod upload;

pub use auth::FacialAuth;
pub use upload::FacialUpload;

const CAPTURE_FAILED: &str = "Could not capture an image. Please try again.";

/// A file dropped on the preview or picked from the device.
#[derive(Debug, Clone, PartialEq)]
pub struct PickedFile {
    pub media_type: String,
    pub bytes: Vec<u8>,
}

/// Capture workflow state plus the camera that feeds it.
#[derive(Clone, Copy)]
pub struct CaptureHandle {
    pub workflow: Signal<CaptureWorkflow>,
    camera_error: Signal<Option<String>>,
    camera: CopyValue<Rc<RefCell<Camera>>>,
}

impl CaptureHandle {
    /// Why the live feed is missing, if the camera could not be opened.
    pub fn camera_error(&self) -> Option<String> {
        (self.camera_error)()
    }

    fn camera(&self) -> Rc<RefCell<Camera>> {
        Rc::clone(&self.camera.read())
    }

    /// Freezes the live frame and releases the camera.
    pub fn capture(&mut self) {
        let camera = self.camera();
        let snapshot = camera.borrow().snapshot();
        match snapshot {
            Ok(image) => {
                if let Err(e) = self.workflow.write().capture(image) {
                    warn!(error = %e, "Ignoring capture");
                }
                camera.borrow_mut().release();
            }
            Err(e) => {
                error!(error = %e, "Failed to capture camera frame");
                self.workflow.write().set_notice(CAPTURE_FAILED);
            }
        }
    }

    /// Uses a picked file instead of the camera. Non-image files leave the
    /// workflow untouched apart from the rejection notice.
    pub fn accept_file(&mut self, file: PickedFile) {
        let accepted = self.workflow.write().accept_file(&file.media_type, file.bytes);
        match accepted {
            Ok(()) => self.camera().borrow_mut().release(),
            Err(e) => info!(error = %e, "Rejected picked file"),
        }
    }

    /// Moves the captured image into the upload, if there is one.
    pub fn begin_upload(&mut self) -> Option<CapturedImage> {
        let started = self.workflow.write().begin_upload();
        started
            .inspect_err(|e| warn!(error = %e, "Upload requested without an image"))
            .ok()
    }

    pub fn set_notice(&mut self, notice: &str) {
        self.workflow.write().set_notice(notice);
    }

    pub fn finish(&mut self, outcome: Result<String, String>) {
        if let Err(e) = self.workflow.write().finish(outcome) {
            warn!(error = %e, "Upload finished in unexpected state");
        }
    }

    /// Discards the current image; the camera is requested again.
    pub fn reset(&mut self) {
        self.camera_error.set(None);
        if let Err(e) = self.workflow.write().reset() {
            debug!(error = %e, "Ignoring reset");
        }
    }
}

/// Sets up the capture workflow and requests the camera whenever the
/// workflow is idle and `camera_wanted` allows it.
pub fn use_capture(mut camera_wanted: impl FnMut() -> bool + 'static) -> CaptureHandle {
    let mut workflow = use_signal(CaptureWorkflow::new);
    let mut camera_error = use_signal(|| None::<String>);
    let camera = use_hook(|| Rc::new(RefCell::new(Camera::default())));
    let camera_value = use_hook({
        let camera = camera.clone();
        move || CopyValue::new(camera)
    });

    use_drop({
        let camera = camera.clone();
        move || camera.borrow_mut().close()
    });

    use_effect(move || {
        let wanted = workflow.read().wants_camera() && camera_wanted();
        if !wanted || camera_error.peek().is_some() || camera.borrow().is_busy() {
            return;
        }
        camera.borrow_mut().set_pending(true);

        let camera = camera.clone();
        // Not tied to the view's teardown: a stream that arrives after the
        // view is gone must still be stopped.
        spawn_forever(async move {
            let attached = match Camera::request().await {
                Ok(stream) => camera.borrow_mut().attach(stream),
                Err(e) => {
                    camera.borrow_mut().set_pending(false);
                    Err(e)
                }
            };
            if camera.borrow().is_closed() {
                return;
            }
            match attached {
                Ok(true) => {
                    if workflow.write().camera_acquired().is_err() {
                        // An image arrived from a file while waiting.
                        camera.borrow_mut().release();
                    }
                }
                Ok(false) => {}
                Err(e) => {
                    workflow.peek().camera_unavailable(&format!("{e:#}"));
                    camera_error.set(Some(
                        "Camera unavailable. You can still drop or pick an image file.".to_string(),
                    ));
                }
            }
        });
    });

    CaptureHandle {
        workflow,
        camera_error,
        camera: camera_value,
    }
}

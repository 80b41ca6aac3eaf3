//! Capture workflow: from acquiring a camera to a still image ready for
//! upload.
//!
//! The workflow only tracks state. Acquiring and releasing the device is the
//! caller's job; the transitions tell it when.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use thiserror::Error;
use tracing::{debug, warn};

pub const IDLE_PROMPT: &str = "Please capture an image to authenticate";
pub const REJECTED_FILE: &str = "Please drop an image file.";
pub const READY_PROMPT: &str = "Image ready. Press Upload to continue.";
pub const UPLOADING_PROMPT: &str = "Uploading...";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CaptureError {
    #[error("Cannot {action} while {state}")]
    InvalidTransition {
        action: &'static str,
        state: &'static str,
    },
    #[error("Not an image: {0}")]
    NotAnImage(String),
    #[error("Invalid image data: {0}")]
    InvalidImage(String),
}

/// A still frame or picked file, held only until it is uploaded.
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedImage {
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl CapturedImage {
    pub fn new(media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            media_type: media_type.into(),
            bytes,
        }
    }

    pub fn jpeg(bytes: Vec<u8>) -> Self {
        Self::new("image/jpeg", bytes)
    }

    /// Decodes a base64 `data:` URL such as a canvas produces.
    pub fn from_data_url(data_url: &str) -> Result<Self, CaptureError> {
        let rest = data_url
            .strip_prefix("data:")
            .ok_or_else(|| CaptureError::InvalidImage("missing data: prefix".to_string()))?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| CaptureError::InvalidImage("missing payload".to_string()))?;
        let media_type = header
            .strip_suffix(";base64")
            .ok_or_else(|| CaptureError::InvalidImage("payload is not base64".to_string()))?;
        let bytes = STANDARD
            .decode(payload)
            .map_err(|e| CaptureError::InvalidImage(e.to_string()))?;
        Ok(Self::new(media_type, bytes))
    }

    /// Encodes the image for use as an `<img src>`.
    pub fn to_data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.media_type,
            STANDARD.encode(&self.bytes)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum CaptureState {
    #[default]
    Idle,
    CameraActive,
    Captured(CapturedImage),
    Uploading(CapturedImage),
    Done,
    Failed,
}

impl CaptureState {
    fn name(&self) -> &'static str {
        match self {
            CaptureState::Idle => "idle",
            CaptureState::CameraActive => "camera is active",
            CaptureState::Captured(_) => "an image is captured",
            CaptureState::Uploading(_) => "uploading",
            CaptureState::Done => "done",
            CaptureState::Failed => "failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CaptureWorkflow {
    state: CaptureState,
    notice: Option<String>,
}

impl CaptureWorkflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &CaptureState {
        &self.state
    }

    /// Latest user-facing message: a rejection or the submission outcome.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn set_notice(&mut self, notice: impl Into<String>) {
        self.notice = Some(notice.into());
    }

    /// Text for the status line: the latest notice, otherwise a prompt for
    /// the current state. `idle_prompt` lets each page phrase its own
    /// instructions.
    pub fn status_message<'a>(&'a self, idle_prompt: &'a str) -> &'a str {
        if let Some(notice) = self.notice.as_deref() {
            return notice;
        }
        match self.state {
            CaptureState::Captured(_) => READY_PROMPT,
            CaptureState::Uploading(_) => UPLOADING_PROMPT,
            _ => idle_prompt,
        }
    }

    /// The image to preview instead of the live camera feed.
    pub fn preview(&self) -> Option<&CapturedImage> {
        match &self.state {
            CaptureState::Captured(image) | CaptureState::Uploading(image) => Some(image),
            _ => None,
        }
    }

    pub fn is_uploading(&self) -> bool {
        matches!(self.state, CaptureState::Uploading(_))
    }

    /// True when the view should try to (re)acquire the camera.
    pub fn wants_camera(&self) -> bool {
        matches!(self.state, CaptureState::Idle)
    }

    pub fn camera_acquired(&mut self) -> Result<(), CaptureError> {
        match self.state {
            CaptureState::Idle => {
                self.state = CaptureState::CameraActive;
                Ok(())
            }
            _ => Err(self.invalid("start the camera")),
        }
    }

    /// Records that the camera could not be opened. Not fatal: a file can
    /// still be dropped or picked.
    pub fn camera_unavailable(&self, reason: &str) {
        warn!(reason, "Camera unavailable, falling back to file input");
    }

    /// Freezes a camera frame. The caller must release the camera.
    pub fn capture(&mut self, image: CapturedImage) -> Result<(), CaptureError> {
        match self.state {
            CaptureState::CameraActive => {
                debug!(bytes = image.bytes.len(), "Captured camera frame");
                self.state = CaptureState::Captured(image);
                Ok(())
            }
            _ => Err(self.invalid("capture")),
        }
    }

    /// Accepts a dropped or picked file in place of a camera frame. Files
    /// whose media type is not `image/*` are rejected and the state is left
    /// untouched.
    pub fn accept_file(&mut self, media_type: &str, bytes: Vec<u8>) -> Result<(), CaptureError> {
        if !matches!(self.state, CaptureState::Idle | CaptureState::CameraActive) {
            return Err(self.invalid("accept a file"));
        }
        if !media_type.starts_with("image/") {
            self.notice = Some(REJECTED_FILE.to_string());
            return Err(CaptureError::NotAnImage(media_type.to_string()));
        }
        debug!(media_type, bytes = bytes.len(), "Accepted image file");
        self.state = CaptureState::Captured(CapturedImage::new(media_type, bytes));
        self.notice = None;
        Ok(())
    }

    /// Hands the captured image to the submission workflow.
    pub fn begin_upload(&mut self) -> Result<CapturedImage, CaptureError> {
        match std::mem::take(&mut self.state) {
            CaptureState::Captured(image) => {
                self.state = CaptureState::Uploading(image.clone());
                Ok(image)
            }
            other => {
                self.state = other;
                Err(self.invalid("upload"))
            }
        }
    }

    /// Completes an upload; the local image is dropped either way.
    pub fn finish(&mut self, outcome: Result<String, String>) -> Result<(), CaptureError> {
        if !self.is_uploading() {
            return Err(self.invalid("finish an upload"));
        }
        let (state, notice) = match outcome {
            Ok(message) => (CaptureState::Done, message),
            Err(message) => (CaptureState::Failed, message),
        };
        self.state = state;
        self.notice = Some(notice);
        Ok(())
    }

    /// Discards the image and returns to `Idle` so the camera can be
    /// reacquired.
    pub fn reset(&mut self) -> Result<(), CaptureError> {
        match self.state {
            CaptureState::Captured(_) | CaptureState::Failed | CaptureState::Done => {
                self.state = CaptureState::Idle;
                self.notice = None;
                Ok(())
            }
            _ => Err(self.invalid("reset")),
        }
    }

    fn invalid(&self, action: &'static str) -> CaptureError {
        CaptureError::InvalidTransition {
            action,
            state: self.state.name(),
        }
    }
}

//! Exclusive access to the device camera through `getUserMedia`.

use crate::browser::{js_error, window};
use anyhow::{anyhow, Context, Result};
use tracing::{debug, info};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    CanvasRenderingContext2d, HtmlCanvasElement, HtmlVideoElement, MediaStream,
    MediaStreamConstraints, MediaStreamTrack,
};
use worksite_core::CapturedImage;

/// DOM id of the `<video>` element showing the live feed.
pub const PREVIEW_ID: &str = "camera-preview";

#[derive(Default)]
pub struct Camera {
    stream: Option<MediaStream>,
    pending: bool,
    closed: bool,
}

impl Camera {
    /// True while a request is out or a stream is held.
    pub fn is_busy(&self) -> bool {
        self.pending || self.stream.is_some()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn set_pending(&mut self, pending: bool) {
        self.pending = pending;
    }

    /// Asks the browser for a video stream.
    pub async fn request() -> Result<MediaStream> {
        let devices = window()?
            .navigator()
            .media_devices()
            .map_err(js_error)
            .context("media devices unavailable")?;
        let constraints = MediaStreamConstraints::new();
        constraints.set_video(&JsValue::TRUE);
        let promise = devices
            .get_user_media_with_constraints(&constraints)
            .map_err(js_error)?;
        let stream = JsFuture::from(promise)
            .await
            .map_err(js_error)
            .context("camera permission denied or no camera")?;
        stream.dyn_into::<MediaStream>().map_err(js_error)
    }

    /// Takes ownership of `stream` and shows it in the preview element.
    /// Returns false, stopping the stream, if the owning view is gone.
    pub fn attach(&mut self, stream: MediaStream) -> Result<bool> {
        self.pending = false;
        if self.closed {
            stop_tracks(&stream);
            return Ok(false);
        }
        let video = match preview_element() {
            Ok(video) => video,
            Err(e) => {
                stop_tracks(&stream);
                return Err(e);
            }
        };
        self.release();
        video.set_src_object(Some(&stream));
        self.stream = Some(stream);
        info!("Camera started");
        Ok(true)
    }

    /// Freezes the current frame as a JPEG.
    pub fn snapshot(&self) -> Result<CapturedImage> {
        if self.stream.is_none() {
            return Err(anyhow!("camera is not running"));
        }
        let video = preview_element()?;
        let document = window()?.document().context("no document")?;
        let canvas: HtmlCanvasElement = document
            .create_element("canvas")
            .map_err(js_error)?
            .dyn_into()
            .map_err(|_| anyhow!("canvas element has unexpected type"))?;
        canvas.set_width(video.video_width());
        canvas.set_height(video.video_height());

        let context: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .map_err(js_error)?
            .context("2d context unavailable")?
            .dyn_into()
            .map_err(|_| anyhow!("2d context has unexpected type"))?;
        context
            .draw_image_with_html_video_element(&video, 0.0, 0.0)
            .map_err(js_error)?;

        let data_url = canvas
            .to_data_url_with_type("image/jpeg")
            .map_err(js_error)?;
        Ok(CapturedImage::from_data_url(&data_url)?)
    }

    /// Stops every track and detaches the preview.
    pub fn release(&mut self) {
        if let Some(stream) = self.stream.take() {
            stop_tracks(&stream);
            if let Ok(video) = preview_element() {
                video.set_src_object(None);
            }
            info!("Camera stopped");
        }
    }

    /// Releases the camera for good; a stream still in flight is stopped on
    /// arrival.
    pub fn close(&mut self) {
        self.closed = true;
        self.release();
    }
}

fn stop_tracks(stream: &MediaStream) {
    for track in stream.get_tracks().iter() {
        if let Ok(track) = track.dyn_into::<MediaStreamTrack>() {
            track.stop();
        }
    }
    debug!("Stopped media tracks");
}

fn preview_element() -> Result<HtmlVideoElement> {
    window()?
        .document()
        .context("no document")?
        .get_element_by_id(PREVIEW_ID)
        .context("camera preview not mounted")?
        .dyn_into::<HtmlVideoElement>()
        .map_err(|_| anyhow!("{PREVIEW_ID} is not a video element"))
}

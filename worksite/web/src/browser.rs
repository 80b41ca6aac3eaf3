//! Thin wrappers over `window` for location and history access.

use anyhow::{anyhow, Context, Result};
use wasm_bindgen::JsValue;
use web_sys::Window;

pub fn js_error(value: JsValue) -> anyhow::Error {
    anyhow!("{value:?}")
}

pub fn window() -> Result<Window> {
    web_sys::window().context("no global window")
}

pub fn location_search() -> Result<String> {
    window()?.location().search().map_err(js_error)
}

pub fn location_pathname() -> Result<String> {
    window()?.location().pathname().map_err(js_error)
}

/// Replaces the current history entry without navigating.
pub fn replace_url(path: &str) -> Result<()> {
    window()?
        .history()
        .map_err(js_error)?
        .replace_state_with_url(&JsValue::NULL, "", Some(path))
        .map_err(js_error)
        .with_context(|| format!("replaceState to {path}"))
}

/// Leaves the app, e.g. for the identity provider's hosted pages.
pub fn redirect_external(url: &str) -> Result<()> {
    window()?
        .location()
        .set_href(url)
        .map_err(js_error)
        .with_context(|| format!("redirect to {url}"))
}

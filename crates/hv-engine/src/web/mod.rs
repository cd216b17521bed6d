//! Browser backend.
//!
//! This module is feature-gated behind `web`. It provides
//! [`CanvasSurface`], the [`Surface`](hv_scene::surface::Surface)
//! implementation over a 2D canvas context, and [`start`], which hands a
//! [`FrameLoop`](crate::frame::FrameLoop) to `requestAnimationFrame` for the
//! lifetime of the page.

pub mod app;
pub mod canvas;

pub use app::start;
pub use canvas::{CanvasSurface, LoadedImage};

use wasm_bindgen::JsValue;

use crate::EngineError;

/// Convert a thrown JS value into an [`EngineError::Js`] tagged with the
/// call that threw.
pub(crate) fn js_error(context: &'static str) -> impl FnOnce(JsValue) -> EngineError {
    move |value| EngineError::Js {
        context: context.to_owned(),
        message: value.as_string().unwrap_or_else(|| format!("{value:?}")),
    }
}

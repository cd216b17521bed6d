//! `requestAnimationFrame` runner.
//!
//! [`start`] takes ownership of a [`FrameLoop`] and drives it from the
//! browser's animation-frame callback until the page goes away. Each
//! callback:
//!
//! 1. Requests any image the scene is still waiting on.
//! 2. Hands finished image loads to the scene.
//! 3. Runs one frame at the callback's timestamp.
//! 4. Schedules the next callback.

use std::cell::RefCell;
use std::rc::Rc;

use hv_scene::util::ENGINE_VERSION;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::HtmlCanvasElement;

use super::canvas::CanvasSurface;
use super::js_error;
use crate::config::EngineConfig;
use crate::frame::FrameLoop;
use crate::EngineError;

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// Start driving `frame_loop` on the canvas named by `config.canvas_id`.
///
/// The canvas is resized to the configured surface. Returns once the first
/// animation frame is scheduled; the loop then runs for the page lifetime.
///
/// # Errors
///
/// Fails if the window, document, canvas or its 2D context is missing, or
/// if the first frame cannot be scheduled.
pub fn start(frame_loop: FrameLoop, config: &EngineConfig) -> Result<(), EngineError> {
    let window = web_sys::window().ok_or(EngineError::MissingHost { what: "window" })?;
    let document = window
        .document()
        .ok_or(EngineError::MissingHost { what: "document" })?;
    let canvas = document
        .get_element_by_id(&config.canvas_id)
        .and_then(|element| element.dyn_into::<HtmlCanvasElement>().ok())
        .ok_or_else(|| EngineError::CanvasNotFound {
            id: config.canvas_id.clone(),
        })?;
    canvas.set_width(config.scene.width);
    canvas.set_height(config.scene.height);

    let runner = Rc::new(RefCell::new(Runner {
        frame_loop,
        surface: CanvasSurface::new(&canvas)?,
    }));

    tracing::info!(
        canvas = %config.canvas_id,
        width = config.scene.width,
        height = config.scene.height,
        "HV-Engine ({ENGINE_VERSION}) ready"
    );

    // The callback holds a handle to its own slot so it can reschedule
    // itself; the cycle keeps it alive for the page lifetime.
    let holder: FrameCallback = Rc::new(RefCell::new(None));
    let holder_for_cb = Rc::clone(&holder);
    let window_for_cb = window.clone();
    let cb = Closure::wrap(Box::new(move |timestamp: f64| {
        runner.borrow_mut().step(timestamp);
        if let Some(next) = holder_for_cb.borrow().as_ref() {
            if let Err(err) = window_for_cb.request_animation_frame(next.as_ref().unchecked_ref()) {
                tracing::error!(error = ?err, "failed to schedule next frame; stopping");
            }
        }
    }) as Box<dyn FnMut(f64)>);

    window
        .request_animation_frame(cb.as_ref().unchecked_ref())
        .map_err(js_error("requestAnimationFrame"))?;
    *holder.borrow_mut() = Some(cb);
    Ok(())
}

struct Runner {
    frame_loop: FrameLoop,
    surface: CanvasSurface,
}

impl Runner {
    fn step(&mut self, timestamp: f64) {
        for src in self.frame_loop.scene().pending_images() {
            if let Err(err) = self.surface.load_image(&src) {
                tracing::warn!(%src, %err, "image load could not start");
            }
        }
        for image in self.surface.drain_loaded() {
            let updated =
                self.frame_loop
                    .scene_mut()
                    .image_loaded_by_src(&image.src, image.width, image.height);
            tracing::debug!(src = %image.src, updated, "image loaded");
        }
        self.frame_loop.frame(timestamp, &mut self.surface);
    }
}

//! [`Surface`] over `CanvasRenderingContext2d`, plus asynchronous image
//! loading.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use hv_scene::color::Color;
use hv_scene::sprite::{ImageRef, Shadow};
use hv_scene::surface::{Paint, Surface};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasGradient, CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use super::js_error;
use crate::EngineError;

/// An image whose `onload` fired since the last [`CanvasSurface::drain_loaded`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedImage {
    pub src: String,
    pub width: u32,
    pub height: u32,
}

/// A canvas 2D context with an image cache.
pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
    images: HashMap<String, HtmlImageElement>,
    loaded: Rc<RefCell<Vec<LoadedImage>>>,
    /// `onload` callbacks; dropping one would detach it from its element.
    callbacks: Vec<Closure<dyn FnMut()>>,
}

impl CanvasSurface {
    /// Take the 2D context of `canvas`.
    ///
    /// # Errors
    ///
    /// Fails if the canvas has no 2D context.
    pub fn new(canvas: &HtmlCanvasElement) -> Result<Self, EngineError> {
        let ctx = canvas
            .get_context("2d")
            .map_err(js_error("getContext"))?
            .ok_or(EngineError::MissingHost { what: "2d context" })?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| EngineError::MissingHost { what: "2d context" })?;
        ctx.set_text_baseline("top");
        Ok(Self {
            ctx,
            images: HashMap::new(),
            loaded: Rc::new(RefCell::new(Vec::new())),
            callbacks: Vec::new(),
        })
    }

    pub fn context(&self) -> &CanvasRenderingContext2d {
        &self.ctx
    }

    /// Start loading `src` unless it is already loading. An image that is
    /// already cached is queued as loaded again right away, so sprites that
    /// switch back to it still learn its size.
    ///
    /// # Errors
    ///
    /// Fails if the image element cannot be created.
    pub fn load_image(&mut self, src: &str) -> Result<(), EngineError> {
        if let Some(cached) = self.images.get(src) {
            if cached.complete() && cached.natural_width() > 0 {
                self.loaded.borrow_mut().push(LoadedImage {
                    src: src.to_owned(),
                    width: cached.natural_width(),
                    height: cached.natural_height(),
                });
            }
            return Ok(());
        }
        let image = HtmlImageElement::new().map_err(js_error("new Image"))?;

        let queue = Rc::clone(&self.loaded);
        let element = image.clone();
        let owned_src = src.to_owned();
        let onload = Closure::wrap(Box::new(move || {
            queue.borrow_mut().push(LoadedImage {
                src: owned_src.clone(),
                width: element.natural_width(),
                height: element.natural_height(),
            });
        }) as Box<dyn FnMut()>);
        let callback: &js_sys::Function = onload.as_ref().unchecked_ref();
        image.set_onload(Some(callback));
        image.set_src(src);

        tracing::debug!(src, "image load started");
        self.callbacks.push(onload);
        self.images.insert(src.to_owned(), image);
        Ok(())
    }

    /// Images that finished loading since the last call.
    pub fn drain_loaded(&mut self) -> Vec<LoadedImage> {
        std::mem::take(&mut *self.loaded.borrow_mut())
    }

    fn gradient(
        &self,
        gradient: CanvasGradient,
        stops: &[(f64, Color)],
    ) -> Result<CanvasGradient, JsValue> {
        for (offset, color) in stops {
            gradient.add_color_stop(*offset as f32, &color.to_css())?;
        }
        Ok(gradient)
    }
}

impl Surface for CanvasSurface {
    type Error = JsValue;

    fn clear(&mut self, width: f64, height: f64) -> Result<(), Self::Error> {
        self.ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)?;
        self.ctx.clear_rect(0.0, 0.0, width, height);
        Ok(())
    }

    fn save(&mut self) {
        self.ctx.save();
    }

    fn restore(&mut self) {
        self.ctx.restore();
    }

    fn rotate(&mut self, radians: f64) -> Result<(), Self::Error> {
        self.ctx.rotate(radians)
    }

    fn begin_path(&mut self) {
        self.ctx.begin_path();
    }

    fn rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.ctx.rect(x, y, width, height);
    }

    fn arc(
        &mut self,
        x: f64,
        y: f64,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
    ) -> Result<(), Self::Error> {
        self.ctx.arc(x, y, radius, start_angle, end_angle)
    }

    fn set_fill(&mut self, paint: &Paint) -> Result<(), Self::Error> {
        match paint {
            Paint::Solid(color) => self.ctx.set_fill_style_str(&color.to_css()),
            Paint::Linear {
                x0,
                y0,
                x1,
                y1,
                stops,
            } => {
                let gradient =
                    self.gradient(self.ctx.create_linear_gradient(*x0, *y0, *x1, *y1), stops)?;
                self.ctx.set_fill_style_canvas_gradient(&gradient);
            }
            Paint::Radial {
                x0,
                y0,
                r0,
                x1,
                y1,
                r1,
                stops,
            } => {
                let gradient = self.gradient(
                    self.ctx.create_radial_gradient(*x0, *y0, *r0, *x1, *y1, *r1)?,
                    stops,
                )?;
                self.ctx.set_fill_style_canvas_gradient(&gradient);
            }
        }
        Ok(())
    }

    fn set_stroke(&mut self, color: &Color, line_width: f64) {
        self.ctx.set_stroke_style_str(&color.to_css());
        self.ctx.set_line_width(line_width);
    }

    fn set_shadow(&mut self, shadow: &Shadow) {
        self.ctx.set_shadow_color(&shadow.color.to_css());
        self.ctx.set_shadow_blur(shadow.blur);
        self.ctx.set_shadow_offset_x(shadow.offset_x);
        self.ctx.set_shadow_offset_y(shadow.offset_y);
    }

    fn fill(&mut self) {
        self.ctx.fill();
    }

    fn stroke(&mut self) {
        self.ctx.stroke();
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.ctx.fill_rect(x, y, width, height);
    }

    /// Blit a cached image. Images not yet requested or still loading draw
    /// nothing.
    fn draw_image(
        &mut self,
        image: &ImageRef,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> Result<(), Self::Error> {
        let Some(element) = self.images.get(&image.src) else {
            return Ok(());
        };
        if !element.complete() || element.natural_width() == 0 {
            return Ok(());
        }
        self.ctx
            .draw_image_with_html_image_element_and_dw_and_dh(element, x, y, width, height)
    }

    fn set_font(&mut self, font: &str) {
        self.ctx.set_font(font);
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) -> Result<(), Self::Error> {
        self.ctx.fill_text(text, x, y)
    }
}

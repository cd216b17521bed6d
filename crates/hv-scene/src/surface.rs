//! The drawing surface abstraction.
//!
//! [`Surface`] is the imperative 2D context the render loop draws through:
//! path construction, fill and stroke, transforms, image blits, gradient
//! paints and shadow parameters. The browser backend implements it over
//! `CanvasRenderingContext2d`; [`RecordingSurface`] implements it by
//! recording every call, which is how draw order and styling are verified
//! without a browser.

use std::convert::Infallible;

use crate::color::Color;
use crate::sprite::{ImageRef, Shadow};

// ---------------------------------------------------------------------------
// Paint
// ---------------------------------------------------------------------------

/// A fill style.
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(Color),
    /// Gradient between two points with `(offset, color)` stops.
    Linear {
        x0: f64,
        y0: f64,
        x1: f64,
        y1: f64,
        stops: Vec<(f64, Color)>,
    },
    /// Gradient between two circles with `(offset, color)` stops.
    Radial {
        x0: f64,
        y0: f64,
        r0: f64,
        x1: f64,
        y1: f64,
        r1: f64,
        stops: Vec<(f64, Color)>,
    },
}

// ---------------------------------------------------------------------------
// Surface
// ---------------------------------------------------------------------------

/// An imperative 2D drawing context.
///
/// Coordinates are in surface pixels. `save`/`restore` push and pop the full
/// drawing state (transform, styles, shadow).
pub trait Surface {
    /// Error raised by fallible host calls.
    type Error: std::fmt::Debug;

    /// Reset the transform and erase a `width` x `height` area.
    fn clear(&mut self, width: f64, height: f64) -> Result<(), Self::Error>;
    fn save(&mut self);
    fn restore(&mut self);
    /// Rotate the current transform around the origin.
    fn rotate(&mut self, radians: f64) -> Result<(), Self::Error>;

    fn begin_path(&mut self);
    fn rect(&mut self, x: f64, y: f64, width: f64, height: f64);
    fn arc(
        &mut self,
        x: f64,
        y: f64,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
    ) -> Result<(), Self::Error>;

    fn set_fill(&mut self, paint: &Paint) -> Result<(), Self::Error>;
    fn set_stroke(&mut self, color: &Color, line_width: f64);
    fn set_shadow(&mut self, shadow: &Shadow);

    /// Fill the current path.
    fn fill(&mut self);
    /// Stroke the current path.
    fn stroke(&mut self);
    /// Fill a rectangle directly, leaving the current path alone.
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64);

    fn draw_image(
        &mut self,
        image: &ImageRef,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> Result<(), Self::Error>;

    fn set_font(&mut self, font: &str);
    /// Draw text with its top-left corner at `(x, y)` in the current fill.
    fn fill_text(&mut self, text: &str, x: f64, y: f64) -> Result<(), Self::Error>;
}

// ---------------------------------------------------------------------------
// RecordingSurface
// ---------------------------------------------------------------------------

/// One recorded [`Surface`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Clear { width: f64, height: f64 },
    Save,
    Restore,
    Rotate(f64),
    BeginPath,
    Rect { x: f64, y: f64, width: f64, height: f64 },
    Arc { x: f64, y: f64, radius: f64 },
    SetFill(Paint),
    SetStroke { color: Color, line_width: f64 },
    SetShadow(Shadow),
    Fill,
    Stroke,
    FillRect { x: f64, y: f64, width: f64, height: f64 },
    DrawImage { src: String, x: f64, y: f64, width: f64, height: f64 },
    SetFont(String),
    FillText { text: String, x: f64, y: f64 },
}

/// A surface that records calls instead of drawing.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    ops: Vec<DrawOp>,
    depth: usize,
    max_depth: usize,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything recorded so far.
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Take the recorded calls, leaving the recorder empty.
    pub fn take(&mut self) -> Vec<DrawOp> {
        std::mem::take(&mut self.ops)
    }

    /// Current `save` nesting; 0 when every `save` was matched by `restore`.
    pub fn save_depth(&self) -> usize {
        self.depth
    }

    /// Deepest `save` nesting seen.
    pub fn max_save_depth(&self) -> usize {
        self.max_depth
    }

    /// Texts drawn with `fill_text`, in order.
    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::FillText { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Surface for RecordingSurface {
    type Error = Infallible;

    fn clear(&mut self, width: f64, height: f64) -> Result<(), Self::Error> {
        self.ops.push(DrawOp::Clear { width, height });
        Ok(())
    }

    fn save(&mut self) {
        self.depth += 1;
        self.max_depth = self.max_depth.max(self.depth);
        self.ops.push(DrawOp::Save);
    }

    fn restore(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.ops.push(DrawOp::Restore);
    }

    fn rotate(&mut self, radians: f64) -> Result<(), Self::Error> {
        self.ops.push(DrawOp::Rotate(radians));
        Ok(())
    }

    fn begin_path(&mut self) {
        self.ops.push(DrawOp::BeginPath);
    }

    fn rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.ops.push(DrawOp::Rect {
            x,
            y,
            width,
            height,
        });
    }

    fn arc(
        &mut self,
        x: f64,
        y: f64,
        radius: f64,
        _start_angle: f64,
        _end_angle: f64,
    ) -> Result<(), Self::Error> {
        self.ops.push(DrawOp::Arc { x, y, radius });
        Ok(())
    }

    fn set_fill(&mut self, paint: &Paint) -> Result<(), Self::Error> {
        self.ops.push(DrawOp::SetFill(paint.clone()));
        Ok(())
    }

    fn set_stroke(&mut self, color: &Color, line_width: f64) {
        self.ops.push(DrawOp::SetStroke {
            color: color.clone(),
            line_width,
        });
    }

    fn set_shadow(&mut self, shadow: &Shadow) {
        self.ops.push(DrawOp::SetShadow(shadow.clone()));
    }

    fn fill(&mut self) {
        self.ops.push(DrawOp::Fill);
    }

    fn stroke(&mut self) {
        self.ops.push(DrawOp::Stroke);
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.ops.push(DrawOp::FillRect {
            x,
            y,
            width,
            height,
        });
    }

    fn draw_image(
        &mut self,
        image: &ImageRef,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> Result<(), Self::Error> {
        self.ops.push(DrawOp::DrawImage {
            src: image.src.clone(),
            x,
            y,
            width,
            height,
        });
        Ok(())
    }

    fn set_font(&mut self, font: &str) {
        self.ops.push(DrawOp::SetFont(font.to_owned()));
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) -> Result<(), Self::Error> {
        self.ops.push(DrawOp::FillText {
            text: text.to_owned(),
            x,
            y,
        });
        Ok(())
    }
}

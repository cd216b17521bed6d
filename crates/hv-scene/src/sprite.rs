//! The sprite model: geometry, styling, visibility and flashing of one
//! drawable, optionally collidable scene object.
//!
//! Sprites are described by [`SpriteOptions`] (deserializable from the same
//! JSON shape scene files use) and validated into a [`Sprite`] by
//! [`Sprite::from_options`]. Construction does not register the sprite
//! anywhere; the [`Scene`](crate::scene::Scene) inserts it into its registry.
//!
//! Movement lives on the scene, because gating a solid sprite requires
//! looking at every other solid sprite.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::collision::Bounds;
use crate::color::{self, Color};
use crate::config::SceneConfig;
use crate::flash::Flash;
use crate::SceneError;

// ---------------------------------------------------------------------------
// Shape
// ---------------------------------------------------------------------------

/// Geometry variant of a sprite.
///
/// Rectangles take their extent from the sprite's `width`/`height` and are
/// positioned by their top-left corner. Circles carry their radius and are
/// positioned by their center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Shape {
    Rectangle,
    Circle { radius: f64 },
}

// ---------------------------------------------------------------------------
// Style blocks
// ---------------------------------------------------------------------------

/// Outline stroked around the sprite's shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Border {
    pub color: Color,
    pub width: f64,
}

impl Default for Border {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            width: 1.0,
        }
    }
}

/// Drop shadow parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Shadow {
    pub color: Color,
    pub blur: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Default for Shadow {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            blur: 0.0,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }
}

/// Gradient geometry family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradientKind {
    #[default]
    Linear,
    Radial,
}

/// Gradient fill drawn over (and replacing) the plain background.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Gradient {
    pub kind: GradientKind,
    /// Color stops, evenly spaced from start to end.
    pub colors: Vec<Color>,
    /// Inset of the gradient endpoints (linear) or inner radius (radial).
    pub ratio: f64,
    /// Direction of a linear gradient in degrees.
    pub angle: f64,
}

/// A raster asset drawn in place of the sprite's shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    pub src: String,
    /// Natural pixel size, known once the host has loaded the image.
    pub natural_size: Option<(u32, u32)>,
}

impl ImageRef {
    pub fn is_loaded(&self) -> bool {
        self.natural_size.is_some()
    }
}

/// Per-sprite state owned by the debug overlay.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DebugState {
    /// Outline color, picked on the first debug draw and kept afterwards.
    pub color: Option<Color>,
}

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Border block of [`SpriteOptions`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BorderOptions {
    pub color: Option<String>,
    pub width: Option<f64>,
}

/// Shadow block of [`SpriteOptions`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShadowOptions {
    pub color: Option<String>,
    pub blur: Option<f64>,
    pub offset_x: Option<f64>,
    pub offset_y: Option<f64>,
}

/// Gradient block of [`SpriteOptions`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GradientOptions {
    #[serde(rename = "type")]
    pub kind: GradientKind,
    pub colors: Vec<String>,
    pub ratio: Option<f64>,
    pub angle: Option<f64>,
}

/// Everything a caller can say about a sprite when creating it.
///
/// Omitted fields take the engine defaults: position `(0, 0)`, rectangle,
/// visible, not solid, no style blocks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SpriteOptions {
    pub name: Option<String>,
    pub x: i32,
    pub y: i32,
    /// Explicit depth (registry slot). Absent means append.
    pub z: Option<usize>,
    pub width: u32,
    pub height: u32,
    /// `"rectangle"` (default) or `"circle"`.
    pub shape: Option<String>,
    pub radius: f64,
    pub angle: f64,
    pub solid: bool,
    pub bound_to_viewport: bool,
    /// Place the sprite in the middle of the surface, overriding `x`/`y`.
    pub center: bool,
    pub visible: Option<bool>,
    pub background: Option<String>,
    pub border: Option<BorderOptions>,
    pub shadow: Option<ShadowOptions>,
    pub gradient: Option<GradientOptions>,
    /// Image source; `width`/`height` left at 0 are taken from the image.
    pub image: Option<String>,
}

impl SpriteOptions {
    /// Parse options from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::Json`] if the JSON does not describe a sprite.
    pub fn from_json(json: &str) -> Result<Self, SceneError> {
        Ok(serde_json::from_str(json)?)
    }
}

// ---------------------------------------------------------------------------
// Sprite
// ---------------------------------------------------------------------------

/// One drawable, optionally collidable scene object.
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    pub name: String,
    pub x: i32,
    pub y: i32,
    /// Extent in pixels. 0 means "not yet known" (waiting on an image).
    pub width: u32,
    pub height: u32,
    pub shape: Shape,
    /// Rotation in degrees, applied around the surface origin.
    pub angle: f64,
    pub visible: bool,
    pub solid: bool,
    pub bound_to_viewport: bool,
    pub background: Option<Color>,
    pub border: Option<Border>,
    pub shadow: Option<Shadow>,
    pub gradient: Option<Gradient>,
    pub image: Option<ImageRef>,
    flash: Option<Flash>,
    debug: DebugState,
}

impl Sprite {
    /// Validate `options` into a sprite.
    ///
    /// `fallback_name` is used when the options carry no name. The `z`
    /// field is ignored here; depth is the registry's business.
    ///
    /// # Errors
    ///
    /// - [`SceneError::UnknownShape`] for a shape name other than
    ///   `rectangle`/`circle`.
    /// - [`SceneError::InvalidGeometry`] for a circle without a positive
    ///   radius, a rectangle without positive `width`/`height` and no image
    ///   to take them from, or a non-finite angle.
    pub fn from_options(
        options: SpriteOptions,
        config: &SceneConfig,
        fallback_name: String,
    ) -> Result<Self, SceneError> {
        let name = options.name.unwrap_or(fallback_name);
        let invalid = |details: &str| SceneError::InvalidGeometry {
            name: name.clone(),
            details: details.to_owned(),
        };

        let shape = match options.shape.as_deref().map(str::to_ascii_lowercase) {
            None => Shape::Rectangle,
            Some(s) if s == "rectangle" || s == "rect" => Shape::Rectangle,
            Some(s) if s == "circle" => Shape::Circle {
                radius: options.radius,
            },
            Some(s) => {
                return Err(SceneError::UnknownShape {
                    name: name.clone(),
                    shape: s,
                })
            }
        };

        let (mut width, mut height) = (options.width, options.height);
        match shape {
            Shape::Circle { radius } => {
                if !(radius.is_finite() && radius > 0.0) {
                    return Err(invalid(&format!(
                        "circle requires a positive radius, got {radius}"
                    )));
                }
                let diameter = (radius * 2.0).ceil() as u32;
                if width == 0 {
                    width = diameter;
                }
                if height == 0 {
                    height = diameter;
                }
            }
            Shape::Rectangle => {
                if options.image.is_none() && (width == 0 || height == 0) {
                    return Err(invalid(&format!(
                        "rectangle requires positive width and height (or an image to size from), got {width}x{height}"
                    )));
                }
            }
        }

        if !options.angle.is_finite() {
            return Err(invalid("angle must be finite"));
        }

        let (mut x, mut y) = (options.x, options.y);
        if options.center {
            let (cx, cy) = (f64::from(config.width) / 2.0, f64::from(config.height) / 2.0);
            match shape {
                Shape::Rectangle => {
                    x = (cx - f64::from(width) / 2.0) as i32;
                    y = (cy - f64::from(height) / 2.0) as i32;
                }
                Shape::Circle { .. } => {
                    x = cx as i32;
                    y = cy as i32;
                }
            }
        }

        let border = options.border.map(|b| Border {
            color: color::normalize_opt(b.color.as_deref()).unwrap_or(Color::BLACK),
            width: b.width.unwrap_or(0.0),
        });
        let shadow = options.shadow.map(|s| Shadow {
            color: color::normalize_opt(s.color.as_deref()).unwrap_or(Color::BLACK),
            blur: s.blur.unwrap_or(0.0),
            offset_x: s.offset_x.unwrap_or(0.0),
            offset_y: s.offset_y.unwrap_or(0.0),
        });
        let gradient = options.gradient.map(|g| Gradient {
            kind: g.kind,
            colors: g.colors.iter().map(|c| color::normalize(c)).collect(),
            ratio: g.ratio.unwrap_or(0.0),
            angle: g.angle.unwrap_or(0.0),
        });

        let mut sprite = Sprite {
            name,
            x,
            y,
            width,
            height,
            shape,
            angle: options.angle,
            visible: options.visible.unwrap_or(true),
            solid: options.solid,
            bound_to_viewport: options.bound_to_viewport,
            background: color::normalize_opt(options.background.as_deref()),
            border,
            shadow,
            gradient,
            image: None,
            flash: None,
            debug: DebugState::default(),
        };
        if let Some(src) = options.image {
            sprite.set_image(src);
        }
        Ok(sprite)
    }

    // -- geometry -----------------------------------------------------------

    /// Collision footprint at the current position.
    pub fn bounds(&self) -> Bounds {
        self.bounds_at(self.x, self.y)
    }

    /// Collision footprint if the sprite stood at `(x, y)`.
    pub fn bounds_at(&self, x: i32, y: i32) -> Bounds {
        Bounds {
            x: f64::from(x),
            y: f64::from(y),
            width: f64::from(self.width),
            height: f64::from(self.height),
            shape: self.shape,
        }
    }

    /// Set the rotation in degrees.
    pub fn rotate(&mut self, angle: f64) {
        self.angle = angle;
    }

    // -- styling ------------------------------------------------------------

    pub fn set_background(&mut self, c: &str) {
        self.background = Some(color::normalize(c));
    }

    pub fn clear_background(&mut self) {
        self.background = None;
    }

    /// Replace the gradient's color stops, creating a linear gradient if
    /// the sprite had none.
    pub fn set_gradient_colors<S: AsRef<str>>(&mut self, colors: &[S]) {
        let gradient = self.gradient.get_or_insert_with(Gradient::default);
        gradient.colors = colors.iter().map(|c| color::normalize(c.as_ref())).collect();
    }

    pub fn set_border_color(&mut self, c: &str) {
        self.border.get_or_insert_with(Border::default).color = color::normalize(c);
    }

    pub fn set_border_width(&mut self, width: f64) {
        self.border.get_or_insert_with(Border::default).width = width;
    }

    pub fn set_shadow_color(&mut self, c: &str) {
        self.shadow.get_or_insert_with(Shadow::default).color = color::normalize(c);
    }

    pub fn set_shadow_blur(&mut self, blur: f64) {
        self.shadow.get_or_insert_with(Shadow::default).blur = blur;
    }

    pub fn set_shadow_offset_x(&mut self, x: f64) {
        self.shadow.get_or_insert_with(Shadow::default).offset_x = x;
    }

    pub fn set_shadow_offset_y(&mut self, y: f64) {
        self.shadow.get_or_insert_with(Shadow::default).offset_y = y;
    }

    // -- image --------------------------------------------------------------

    /// Point the sprite at a new image. The image is pending until the host
    /// reports it loaded through [`image_loaded`](Self::image_loaded).
    pub fn set_image(&mut self, src: impl Into<String>) {
        self.image = Some(ImageRef {
            src: src.into(),
            natural_size: None,
        });
    }

    /// Record that the sprite's image finished loading.
    ///
    /// Fills `width`/`height` from the natural size only where they are
    /// still unset. Returns `true` if any dimension was inferred.
    pub fn image_loaded(&mut self, natural_width: u32, natural_height: u32) -> bool {
        let Some(image) = self.image.as_mut() else {
            return false;
        };
        image.natural_size = Some((natural_width, natural_height));

        if self.width != 0 && self.height != 0 {
            return false;
        }
        if self.width == 0 {
            self.width = natural_width;
        }
        if self.height == 0 {
            self.height = natural_height;
        }
        tracing::warn!(
            sprite = %self.name,
            width = self.width,
            height = self.height,
            "sprite dimensions were taken from its image because no width or height was set"
        );
        true
    }

    // -- visibility ---------------------------------------------------------

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }

    pub fn show(&mut self) {
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    /// Start toggling visibility every `seconds`.
    ///
    /// The sprite is made visible first. `times = 0` flashes until
    /// [`stop_flashing`](Self::stop_flashing); otherwise the flash stops on
    /// its own after `times + 1` toggles. Re-arming replaces any running
    /// flash.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::InvalidFlashPeriod`] for a non-positive or
    /// non-finite period; the sprite is left untouched.
    pub fn flash(&mut self, seconds: f64, times: u32) -> Result<(), SceneError> {
        let timer = Flash::new(seconds, times)?;
        self.visible = true;
        if self.flash.replace(timer).is_some() {
            tracing::debug!(sprite = %self.name, "flash re-armed, previous flash cancelled");
        } else {
            tracing::debug!(sprite = %self.name, seconds, times, "flash started");
        }
        Ok(())
    }

    /// Cancel a running flash. Returns whether one was running.
    pub fn stop_flashing(&mut self) -> bool {
        let was_flashing = self.flash.take().is_some();
        if was_flashing {
            tracing::debug!(sprite = %self.name, "flash stopped");
        }
        was_flashing
    }

    pub fn is_flashing(&self) -> bool {
        self.flash.is_some()
    }

    /// The running flash timer, if any.
    pub fn flash_timer(&self) -> Option<&Flash> {
        self.flash.as_ref()
    }

    /// Advance the flash timer by `dt`, applying due toggles. Returns the
    /// number of toggles performed.
    pub(crate) fn advance_flash(&mut self, dt: Duration) -> u32 {
        let Some(timer) = self.flash.as_mut() else {
            return 0;
        };
        let tick = timer.advance(dt);
        if tick.toggles % 2 == 1 {
            self.visible = !self.visible;
        }
        if tick.finished {
            self.flash = None;
            tracing::debug!(sprite = %self.name, "flash finished");
        }
        tick.toggles
    }

    // -- debug --------------------------------------------------------------

    pub fn debug_state(&self) -> &DebugState {
        &self.debug
    }

    /// The debug outline color, choosing it with `pick` on first use.
    pub(crate) fn debug_color_or_pick(&mut self, pick: impl FnOnce() -> Color) -> Color {
        self.debug.color.get_or_insert_with(pick).clone()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

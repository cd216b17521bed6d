//! The per-frame draw pass.
//!
//! [`render_frame`] clears the surface, walks the registry in draw order
//! (depth descending) and draws each sprite. With debug mode on, every
//! sprite gets its overlay first, hidden or not. Each sprite is drawn inside
//! its own `save`/`restore` pair so transforms and styles never leak into the
//! next one.
//!
//! Per visible sprite the order is: rotation (around the surface origin),
//! shadow when [`ShadowOrder::BeforeDraw`], base geometry (image blit and/or
//! shape path), border stroke, background fill, gradient fill, shadow when
//! [`ShadowOrder::AfterDraw`].

use std::f64::consts::TAU;

use rand::Rng;

use crate::config::{SceneConfig, ShadowOrder};
use crate::debug;
use crate::registry::Registry;
use crate::sprite::{Gradient, GradientKind, Shape, Sprite};
use crate::surface::{Paint, Surface};

/// What one frame drew.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Sprites drawn normally.
    pub drawn: usize,
    /// Sprites skipped because they are hidden.
    pub hidden: usize,
    /// Debug overlays drawn.
    pub overlays: usize,
}

/// Draw every live sprite in `registry` onto `surface`.
///
/// Takes the registry mutably only so the debug overlay can cache each
/// sprite's outline color on first use.
///
/// # Errors
///
/// Propagates the first error raised by the surface. The `save`/`restore`
/// pair of the failing sprite is still balanced.
pub fn render_frame<S: Surface, R: Rng + ?Sized>(
    surface: &mut S,
    registry: &mut Registry,
    config: &SceneConfig,
    rng: &mut R,
) -> Result<FrameStats, S::Error> {
    let mut stats = FrameStats::default();
    surface.clear(f64::from(config.width), f64::from(config.height))?;

    for id in registry.draw_order() {
        let Some(sprite) = registry.get_mut(id) else {
            continue;
        };

        if config.debug {
            debug::draw_overlay(surface, sprite, rng)?;
            stats.overlays += 1;
        }

        if !sprite.visible {
            stats.hidden += 1;
            continue;
        }

        draw_sprite(surface, sprite, config.shadow_order)?;
        stats.drawn += 1;
    }

    tracing::trace!(
        drawn = stats.drawn,
        hidden = stats.hidden,
        overlays = stats.overlays,
        "frame rendered"
    );
    Ok(stats)
}

/// Run `draw` between `save` and `restore`, restoring even on error.
pub(crate) fn isolated<S, F>(surface: &mut S, draw: F) -> Result<(), S::Error>
where
    S: Surface,
    F: FnOnce(&mut S) -> Result<(), S::Error>,
{
    surface.save();
    let result = draw(surface);
    surface.restore();
    result
}

/// Add the sprite's shape to the current path.
pub(crate) fn trace_shape<S: Surface>(surface: &mut S, sprite: &Sprite) -> Result<(), S::Error> {
    let (x, y) = (f64::from(sprite.x), f64::from(sprite.y));
    match sprite.shape {
        Shape::Rectangle => {
            surface.rect(x, y, f64::from(sprite.width), f64::from(sprite.height));
            Ok(())
        }
        Shape::Circle { radius } => surface.arc(x, y, radius, 0.0, TAU),
    }
}

fn draw_sprite<S: Surface>(
    surface: &mut S,
    sprite: &Sprite,
    shadow_order: ShadowOrder,
) -> Result<(), S::Error> {
    isolated(surface, |s| {
        s.begin_path();
        if sprite.angle != 0.0 {
            s.rotate(sprite.angle.to_radians())?;
        }

        if shadow_order == ShadowOrder::BeforeDraw {
            if let Some(shadow) = &sprite.shadow {
                s.set_shadow(shadow);
            }
        }

        let bounds = sprite.bounds();
        if let Some(image) = &sprite.image {
            s.draw_image(
                image,
                bounds.left(),
                bounds.top(),
                bounds.width,
                bounds.height,
            )?;
        }
        trace_shape(s, sprite)?;

        if let Some(border) = &sprite.border {
            // Canvas ignores non-positive line widths and keeps its default of 1.
            let width = if border.width > 0.0 { border.width } else { 1.0 };
            s.set_stroke(&border.color, width);
            s.stroke();
        }

        if let Some(background) = &sprite.background {
            s.set_fill(&Paint::Solid(background.clone()))?;
            s.fill();
        }

        if let Some(gradient) = &sprite.gradient {
            s.set_fill(&gradient_paint(sprite, gradient))?;
            match sprite.shape {
                Shape::Rectangle => s.fill_rect(
                    bounds.left(),
                    bounds.top(),
                    bounds.width,
                    bounds.height,
                ),
                Shape::Circle { .. } => s.fill(),
            }
        }

        if shadow_order == ShadowOrder::AfterDraw {
            if let Some(shadow) = &sprite.shadow {
                s.set_shadow(shadow);
            }
        }
        Ok(())
    })
}

/// Build the paint for a sprite's gradient.
///
/// Linear gradients run through the sprite's center along the gradient
/// angle, spanning the sprite's width inset by `ratio` at each end. Radial
/// gradients grow from an inner circle of radius `ratio` to half the larger
/// side. Stops are spread evenly over `[0, 1]`.
pub fn gradient_paint(sprite: &Sprite, gradient: &Gradient) -> Paint {
    let bounds = sprite.bounds();
    let cx = bounds.left() + bounds.width / 2.0;
    let cy = bounds.top() + bounds.height / 2.0;

    let last = gradient.colors.len().saturating_sub(1);
    let stops = gradient
        .colors
        .iter()
        .enumerate()
        .map(|(i, color)| {
            let offset = if last == 0 { 0.0 } else { i as f64 / last as f64 };
            (offset, color.clone())
        })
        .collect();

    match gradient.kind {
        GradientKind::Linear => {
            let half = bounds.width / 2.0 - gradient.ratio;
            let (sin, cos) = gradient.angle.to_radians().sin_cos();
            Paint::Linear {
                x0: cx - cos * half,
                y0: cy - sin * half,
                x1: cx + cos * half,
                y1: cy + sin * half,
                stops,
            }
        }
        GradientKind::Radial => Paint::Radial {
            x0: cx,
            y0: cy,
            r0: gradient.ratio.max(0.0),
            x1: cx,
            y1: cy,
            r1: bounds.width.max(bounds.height) / 2.0,
            stops,
        },
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::sprite::{GradientOptions, ShadowOptions, SpriteOptions};
    use crate::surface::{DrawOp, RecordingSurface};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn sprite(options: SpriteOptions) -> Sprite {
        Sprite::from_options(options, &SceneConfig::default(), "s".to_owned()).unwrap()
    }

    fn rect_options(x: i32, y: i32) -> SpriteOptions {
        SpriteOptions {
            x,
            y,
            width: 10,
            height: 20,
            ..Default::default()
        }
    }

    fn render(registry: &mut Registry, config: &SceneConfig) -> RecordingSurface {
        let mut surface = RecordingSurface::new();
        let mut rng = Pcg32::seed_from_u64(0);
        render_frame(&mut surface, registry, config, &mut rng).unwrap();
        surface
    }

    #[test]
    fn empty_registry_only_clears() {
        let mut registry = Registry::new();
        let surface = render(&mut registry, &SceneConfig::default());
        assert_eq!(
            surface.ops(),
            &[DrawOp::Clear {
                width: 800.0,
                height: 600.0
            }]
        );
    }

    #[test]
    fn plain_rectangle_ops() {
        let mut registry = Registry::new();
        registry.insert(
            sprite(SpriteOptions {
                background: Some("red".to_owned()),
                ..rect_options(1, 2)
            }),
            None,
        )
        .unwrap();
        let surface = render(&mut registry, &SceneConfig::default());
        assert_eq!(
            &surface.ops()[1..],
            &[
                DrawOp::Save,
                DrawOp::BeginPath,
                DrawOp::Rect {
                    x: 1.0,
                    y: 2.0,
                    width: 10.0,
                    height: 20.0
                },
                DrawOp::SetFill(Paint::Solid(Color::rgb(255, 0, 0))),
                DrawOp::Fill,
                DrawOp::Restore,
            ]
        );
        assert_eq!(surface.save_depth(), 0);
    }

    #[test]
    fn hidden_sprites_are_skipped() {
        let mut registry = Registry::new();
        registry.insert(
            sprite(SpriteOptions {
                visible: Some(false),
                ..rect_options(0, 0)
            }),
            None,
        )
        .unwrap();
        let mut surface = RecordingSurface::new();
        let stats = render_frame(
            &mut surface,
            &mut registry,
            &SceneConfig::default(),
            &mut Pcg32::seed_from_u64(0),
        )
        .unwrap();
        assert_eq!(stats, FrameStats { drawn: 0, hidden: 1, overlays: 0 });
        assert_eq!(surface.ops().len(), 1);
    }

    #[test]
    fn rotation_is_applied_in_radians_before_geometry() {
        let mut registry = Registry::new();
        registry.insert(
            sprite(SpriteOptions {
                angle: 90.0,
                ..rect_options(0, 0)
            }),
            None,
        )
        .unwrap();
        let surface = render(&mut registry, &SceneConfig::default());
        let ops = surface.ops();
        let rotate = ops
            .iter()
            .position(|op| matches!(op, DrawOp::Rotate(r) if (r - std::f64::consts::FRAC_PI_2).abs() < 1e-12))
            .expect("rotate recorded");
        let rect = ops
            .iter()
            .position(|op| matches!(op, DrawOp::Rect { .. }))
            .unwrap();
        assert!(rotate < rect);
    }

    #[test]
    fn shadow_before_or_after_primitives() {
        let options = SpriteOptions {
            background: Some("blue".to_owned()),
            shadow: Some(ShadowOptions {
                blur: Some(3.0),
                ..Default::default()
            }),
            ..rect_options(0, 0)
        };

        let position_of = |ops: &[DrawOp], pred: fn(&DrawOp) -> bool| ops.iter().position(pred).unwrap();
        let is_shadow: fn(&DrawOp) -> bool = |op| matches!(op, DrawOp::SetShadow(_));
        let is_fill: fn(&DrawOp) -> bool = |op| matches!(op, DrawOp::Fill);

        let mut registry = Registry::new();
        registry.insert(sprite(options.clone()), None).unwrap();
        let before = render(&mut registry, &SceneConfig::default());
        assert!(position_of(before.ops(), is_shadow) < position_of(before.ops(), is_fill));

        let legacy = SceneConfig {
            shadow_order: ShadowOrder::AfterDraw,
            ..Default::default()
        };
        let after = render(&mut registry, &legacy);
        assert!(position_of(after.ops(), is_shadow) > position_of(after.ops(), is_fill));
    }

    #[test]
    fn border_stroke_precedes_fill_and_zero_width_falls_back() {
        let mut s = sprite(SpriteOptions {
            background: Some("white".to_owned()),
            ..rect_options(0, 0)
        });
        s.set_border_color("black");
        s.set_border_width(0.0);
        let mut registry = Registry::new();
        registry.insert(s, None).unwrap();

        let surface = render(&mut registry, &SceneConfig::default());
        let ops = surface.ops();
        let stroke = ops.iter().position(|op| *op == DrawOp::Stroke).unwrap();
        let fill = ops.iter().position(|op| *op == DrawOp::Fill).unwrap();
        assert!(stroke < fill);
        assert!(ops.contains(&DrawOp::SetStroke {
            color: Color::BLACK,
            line_width: 1.0
        }));
    }

    #[test]
    fn gradient_fills_rect_and_circle() {
        let gradient = Some(GradientOptions {
            colors: vec!["red".to_owned(), "blue".to_owned()],
            ..Default::default()
        });
        let mut registry = Registry::new();
        registry.insert(
            sprite(SpriteOptions {
                gradient: gradient.clone(),
                ..rect_options(0, 0)
            }),
            None,
        )
        .unwrap();
        registry.insert(
            sprite(SpriteOptions {
                shape: Some("circle".to_owned()),
                radius: 5.0,
                x: 50,
                y: 50,
                gradient,
                ..Default::default()
            }),
            None,
        )
        .unwrap();

        let surface = render(&mut registry, &SceneConfig::default());
        let ops = surface.ops();
        assert!(ops.contains(&DrawOp::FillRect {
            x: 0.0,
            y: 0.0,
            width: 10.0,
            height: 20.0
        }));
        assert!(ops.contains(&DrawOp::Arc {
            x: 50.0,
            y: 50.0,
            radius: 5.0
        }));
        assert_eq!(ops.iter().filter(|op| **op == DrawOp::Fill).count(), 1);
    }

    #[test]
    fn linear_gradient_geometry() {
        let s = sprite(SpriteOptions {
            gradient: Some(GradientOptions {
                colors: vec!["red".to_owned(), "lime".to_owned(), "blue".to_owned()],
                ratio: Some(2.0),
                ..Default::default()
            }),
            ..rect_options(10, 10)
        });
        let paint = gradient_paint(&s, s.gradient.as_ref().unwrap());
        let Paint::Linear {
            x0,
            y0,
            x1,
            y1,
            stops,
        } = paint
        else {
            panic!("expected a linear gradient");
        };
        assert_eq!((x0, x1), (12.0, 18.0));
        assert_eq!((y0, y1), (20.0, 20.0));
        let offsets: Vec<f64> = stops.iter().map(|(o, _)| *o).collect();
        assert_eq!(offsets, vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn radial_gradient_geometry() {
        let s = sprite(SpriteOptions {
            gradient: Some(GradientOptions {
                kind: GradientKind::Radial,
                colors: vec!["red".to_owned()],
                ratio: Some(1.0),
                ..Default::default()
            }),
            ..rect_options(0, 0)
        });
        let paint = gradient_paint(&s, s.gradient.as_ref().unwrap());
        assert_eq!(
            paint,
            Paint::Radial {
                x0: 5.0,
                y0: 10.0,
                r0: 1.0,
                x1: 5.0,
                y1: 10.0,
                r1: 10.0,
                stops: vec![(0.0, Color::rgb(255, 0, 0))],
            }
        );
    }

    #[test]
    fn image_is_blitted_at_bounds() {
        let mut s = sprite(SpriteOptions {
            image: Some("hero.png".to_owned()),
            x: 4,
            y: 6,
            ..Default::default()
        });
        s.image_loaded(16, 8);
        let mut registry = Registry::new();
        registry.insert(s, None).unwrap();

        let surface = render(&mut registry, &SceneConfig::default());
        assert!(surface.ops().contains(&DrawOp::DrawImage {
            src: "hero.png".to_owned(),
            x: 4.0,
            y: 6.0,
            width: 16.0,
            height: 8.0
        }));
    }
}

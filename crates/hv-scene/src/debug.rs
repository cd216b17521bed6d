//! Debug overlay: an info panel beside each sprite and a colored outline
//! around its shape.

use rand::Rng;

use crate::color::{self, Color};
use crate::render::{isolated, trace_shape};
use crate::sprite::Sprite;
use crate::surface::{Paint, Surface};
use crate::util::rand_int;

/// Outline palette; each sprite keeps the entry it drew first.
pub const DEBUG_COLORS: [&str; 3] = ["#FF00FF", "#00FFFF", "#00FF0E"];

pub const PANEL_WIDTH: f64 = 145.0;
pub const PANEL_HEIGHT: f64 = 135.0;
/// Horizontal gap between the sprite's right edge and the panel.
pub const PANEL_GAP: f64 = 10.0;
pub const PANEL_PADDING: f64 = 10.0;
pub const LINE_HEIGHT: f64 = 20.0;
pub const PANEL_BACKGROUND: &str = "#121212";
pub const TEXT_COLOR: &str = "#fafafa";
pub const FONT: &str = "14px 'Courier'";
pub const OUTLINE_WIDTH: f64 = 5.0;

/// The lines printed in a sprite's panel, top to bottom.
pub fn panel_lines(sprite: &Sprite) -> [String; 6] {
    [
        format!("name: {}", sprite.name),
        format!("visible: {}", sprite.visible),
        format!("x: {}", sprite.x),
        format!("y: {}", sprite.y),
        format!("width: {}", sprite.width),
        format!("height: {}", sprite.height),
    ]
}

/// Draw the overlay for one sprite.
///
/// The outline color is picked from [`DEBUG_COLORS`] with `rng` the first
/// time and cached on the sprite.
pub fn draw_overlay<S: Surface, R: Rng + ?Sized>(
    surface: &mut S,
    sprite: &mut Sprite,
    rng: &mut R,
) -> Result<(), S::Error> {
    let x = f64::from(sprite.x) + f64::from(sprite.width) + PANEL_GAP;
    let y = f64::from(sprite.y);

    isolated(surface, |s| {
        s.begin_path();
        s.rect(x, y, PANEL_WIDTH, PANEL_HEIGHT);
        s.set_fill(&Paint::Solid(color::normalize(PANEL_BACKGROUND)))?;
        s.fill();
        Ok(())
    })?;

    isolated(surface, |s| {
        s.set_fill(&Paint::Solid(color::normalize(TEXT_COLOR)))?;
        s.set_font(FONT);
        for (i, line) in panel_lines(sprite).iter().enumerate() {
            s.fill_text(
                line,
                x + PANEL_PADDING,
                y + PANEL_PADDING + LINE_HEIGHT * i as f64,
            )?;
        }
        Ok(())
    })?;

    let outline = sprite.debug_color_or_pick(|| pick_color(rng));
    isolated(surface, |s| {
        s.begin_path();
        if sprite.angle != 0.0 {
            s.rotate(sprite.angle.to_radians())?;
        }
        trace_shape(s, sprite)?;
        s.set_stroke(&outline, OUTLINE_WIDTH);
        s.stroke();
        Ok(())
    })
}

fn pick_color<R: Rng + ?Sized>(rng: &mut R) -> Color {
    let last = DEBUG_COLORS.len() as i64 - 1;
    color::normalize(DEBUG_COLORS[rand_int(rng, 0, last) as usize])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SceneConfig;
    use crate::sprite::SpriteOptions;
    use crate::surface::{DrawOp, RecordingSurface};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn sprite() -> Sprite {
        Sprite::from_options(
            SpriteOptions {
                name: Some("hero".to_owned()),
                x: 10,
                y: 20,
                width: 30,
                height: 40,
                ..Default::default()
            },
            &SceneConfig::default(),
            "unused".to_owned(),
        )
        .unwrap()
    }

    #[test]
    fn panel_reports_real_height() {
        let lines = panel_lines(&sprite());
        assert_eq!(lines[0], "name: hero");
        assert_eq!(lines[1], "visible: true");
        assert_eq!(lines[4], "width: 30");
        assert_eq!(lines[5], "height: 40");
    }

    #[test]
    fn overlay_draws_panel_text_and_outline() {
        let mut s = sprite();
        let mut surface = RecordingSurface::new();
        draw_overlay(&mut surface, &mut s, &mut Pcg32::seed_from_u64(1)).unwrap();

        let ops = surface.ops();
        assert!(ops.contains(&DrawOp::Rect {
            x: 50.0,
            y: 20.0,
            width: PANEL_WIDTH,
            height: PANEL_HEIGHT
        }));
        assert!(ops.contains(&DrawOp::FillText {
            text: "x: 10".to_owned(),
            x: 60.0,
            y: 70.0
        }));
        assert_eq!(surface.texts().len(), 6);
        assert_eq!(surface.save_depth(), 0);

        let stroke = ops
            .iter()
            .find_map(|op| match op {
                DrawOp::SetStroke { color, line_width } => Some((color.clone(), *line_width)),
                _ => None,
            })
            .unwrap();
        assert_eq!(stroke.1, OUTLINE_WIDTH);
        let palette: Vec<Color> = DEBUG_COLORS.iter().map(|c| color::normalize(c)).collect();
        assert!(palette.contains(&stroke.0));
        assert_eq!(s.debug_state().color, Some(stroke.0));
    }

    #[test]
    fn outline_color_is_stable() {
        let mut s = sprite();
        let mut rng = Pcg32::seed_from_u64(9);
        let mut surface = RecordingSurface::new();
        draw_overlay(&mut surface, &mut s, &mut rng).unwrap();
        let first = s.debug_state().color.clone();
        for _ in 0..10 {
            draw_overlay(&mut surface, &mut s, &mut rng).unwrap();
        }
        assert_eq!(s.debug_state().color, first);
    }
}

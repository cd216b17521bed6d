//! Color normalization.
//!
//! Sprite options accept loose color input: CSS color names (`"red"`), hex
//! notation in any of its four lengths (`"#f00"`, `"#f00f"`, `"#ff0000"`,
//! `"#ff0000ff"`), or any other CSS color expression. [`normalize`] turns
//! names and hex into a canonical [`Color::Rgba`]; everything else is passed
//! through untouched as [`Color::Css`] and left for the drawing surface to
//! interpret.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Color
// ---------------------------------------------------------------------------

/// A drawable color value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Color {
    /// A fully resolved 8-bit RGBA color.
    Rgba { r: u8, g: u8, b: u8, a: u8 },
    /// An expression the engine does not resolve itself (e.g. `hsl(...)`).
    Css(String),
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    /// An opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color::Rgba { r, g, b, a: 255 }
    }

    /// The CSS representation handed to the drawing surface.
    ///
    /// Opaque colors render as lowercase `#rrggbb`; translucent ones as
    /// `rgba(r, g, b, alpha)` with alpha in `0..=1`.
    pub fn to_css(&self) -> String {
        match self {
            Color::Rgba { r, g, b, a: 255 } => format!("#{r:02x}{g:02x}{b:02x}"),
            Color::Rgba { r, g, b, a } => {
                let alpha = f64::from(*a) / 255.0;
                format!("rgba({r}, {g}, {b}, {alpha:.3})")
            }
            Color::Css(raw) => raw.clone(),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css())
    }
}

impl From<String> for Color {
    fn from(value: String) -> Self {
        normalize(&value)
    }
}

impl From<&str> for Color {
    fn from(value: &str) -> Self {
        normalize(value)
    }
}

impl From<Color> for String {
    fn from(value: Color) -> Self {
        value.to_css()
    }
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// CSS named colors resolved by [`normalize`].
const NAMED_COLORS: &[(&str, [u8; 3])] = &[
    ("aqua", [0, 255, 255]),
    ("black", [0, 0, 0]),
    ("blue", [0, 0, 255]),
    ("brown", [165, 42, 42]),
    ("coral", [255, 127, 80]),
    ("crimson", [220, 20, 60]),
    ("cyan", [0, 255, 255]),
    ("darkblue", [0, 0, 139]),
    ("darkgray", [169, 169, 169]),
    ("darkgreen", [0, 100, 0]),
    ("darkgrey", [169, 169, 169]),
    ("darkred", [139, 0, 0]),
    ("fuchsia", [255, 0, 255]),
    ("gold", [255, 215, 0]),
    ("gray", [128, 128, 128]),
    ("green", [0, 128, 0]),
    ("grey", [128, 128, 128]),
    ("indigo", [75, 0, 130]),
    ("khaki", [240, 230, 140]),
    ("lightblue", [173, 216, 230]),
    ("lightgray", [211, 211, 211]),
    ("lightgreen", [144, 238, 144]),
    ("lightgrey", [211, 211, 211]),
    ("lime", [0, 255, 0]),
    ("magenta", [255, 0, 255]),
    ("maroon", [128, 0, 0]),
    ("navy", [0, 0, 128]),
    ("olive", [128, 128, 0]),
    ("orange", [255, 165, 0]),
    ("pink", [255, 192, 203]),
    ("purple", [128, 0, 128]),
    ("red", [255, 0, 0]),
    ("salmon", [250, 128, 114]),
    ("silver", [192, 192, 192]),
    ("skyblue", [135, 206, 235]),
    ("teal", [0, 128, 128]),
    ("tomato", [255, 99, 71]),
    ("turquoise", [64, 224, 208]),
    ("violet", [238, 130, 238]),
    ("white", [255, 255, 255]),
    ("yellow", [255, 255, 0]),
];

/// Normalize loose color input into a [`Color`].
///
/// Never fails: input that is neither a known name nor valid hex is kept
/// verbatim (trimmed) as [`Color::Css`].
pub fn normalize(input: &str) -> Color {
    let trimmed = input.trim();
    let lower = trimmed.to_ascii_lowercase();

    if lower == "transparent" {
        return Color::Rgba { r: 0, g: 0, b: 0, a: 0 };
    }

    if let Some(hex) = lower.strip_prefix('#') {
        if let Some(color) = parse_hex(hex) {
            return color;
        }
    } else if let Some((_, [r, g, b])) = NAMED_COLORS.iter().find(|(name, _)| *name == lower) {
        return Color::rgb(*r, *g, *b);
    }

    Color::Css(trimmed.to_owned())
}

/// Normalize an optional color; empty or missing input yields `None`.
pub fn normalize_opt(input: Option<&str>) -> Option<Color> {
    match input {
        Some(s) if !s.trim().is_empty() => Some(normalize(s)),
        _ => None,
    }
}

/// Parse the digits of a hex color (without `#`).
fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let nibble = |i: usize| u8::from_str_radix(&hex[i..=i], 16).ok().map(|v| v * 17);
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();

    match hex.len() {
        3 => Some(Color::rgb(nibble(0)?, nibble(1)?, nibble(2)?)),
        4 => Some(Color::Rgba {
            r: nibble(0)?,
            g: nibble(1)?,
            b: nibble(2)?,
            a: nibble(3)?,
        }),
        6 => Some(Color::rgb(byte(0)?, byte(2)?, byte(4)?)),
        8 => Some(Color::Rgba {
            r: byte(0)?,
            g: byte(2)?,
            b: byte(4)?,
            a: byte(6)?,
        }),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_colors_resolve_case_insensitively() {
        assert_eq!(normalize("red"), Color::rgb(255, 0, 0));
        assert_eq!(normalize("  Black "), Color::BLACK);
        assert_eq!(normalize("WHITE"), Color::WHITE);
    }

    #[test]
    fn hex_forms_resolve() {
        assert_eq!(normalize("#f00"), Color::rgb(255, 0, 0));
        assert_eq!(normalize("#FF00FF"), Color::rgb(255, 0, 255));
        assert_eq!(
            normalize("#00ff0080"),
            Color::Rgba { r: 0, g: 255, b: 0, a: 128 }
        );
        assert_eq!(
            normalize("#0f08"),
            Color::Rgba { r: 0, g: 255, b: 0, a: 136 }
        );
    }

    #[test]
    fn unknown_input_passes_through() {
        assert_eq!(
            normalize("hsl(120, 50%, 50%)"),
            Color::Css("hsl(120, 50%, 50%)".to_owned())
        );
        assert_eq!(normalize("#12345"), Color::Css("#12345".to_owned()));
        assert_eq!(normalize("#gggggg"), Color::Css("#gggggg".to_owned()));
    }

    #[test]
    fn optional_input() {
        assert_eq!(normalize_opt(None), None);
        assert_eq!(normalize_opt(Some("   ")), None);
        assert_eq!(normalize_opt(Some("blue")), Some(Color::rgb(0, 0, 255)));
    }

    #[test]
    fn css_output() {
        assert_eq!(Color::rgb(255, 0, 255).to_css(), "#ff00ff");
        assert_eq!(normalize("transparent").to_css(), "rgba(0, 0, 0, 0.000)");
        assert_eq!(normalize("rebeccapurple").to_css(), "rebeccapurple");
    }

    #[test]
    fn serde_goes_through_normalization() {
        let c: Color = serde_json::from_str("\"#0000ff\"").unwrap();
        assert_eq!(c, Color::rgb(0, 0, 255));
        assert_eq!(serde_json::to_string(&c).unwrap(), "\"#0000ff\"");
    }
}

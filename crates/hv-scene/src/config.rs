//! Scene configuration.
//!
//! The [`SceneConfig`] is the configuration accessor the scene reads while
//! constructing sprites (centering), resolving viewport-bound movement and
//! drawing (surface size, debug overlay, shadow ordering).

use serde::{Deserialize, Serialize};

use crate::SceneError;

// ---------------------------------------------------------------------------
// ShadowOrder
// ---------------------------------------------------------------------------

/// When a sprite's shadow parameters are applied relative to its primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ShadowOrder {
    /// Shadow state is set before any primitive is drawn, so it is visible.
    #[default]
    BeforeDraw,
    /// Shadow state is set after stroke and fill. It affects nothing that
    /// sprite draws; kept for parity with scenes authored against that order.
    AfterDraw,
}

// ---------------------------------------------------------------------------
// SceneConfig
// ---------------------------------------------------------------------------

/// Render-surface dimensions and scene-wide switches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SceneConfig {
    /// Surface width in pixels.
    pub width: u32,
    /// Surface height in pixels.
    pub height: u32,
    /// Draw the debug overlay for every sprite.
    pub debug: bool,
    pub shadow_order: ShadowOrder,
    /// Seed for the RNG that picks debug outline colors.
    pub seed: u64,
}

impl Default for SceneConfig {
    /// An 800x600 surface, debug off, shadows before primitives.
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            debug: false,
            shadow_order: ShadowOrder::BeforeDraw,
            seed: 0,
        }
    }
}

impl SceneConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::Json`] on malformed input and
    /// [`SceneError::InvalidConfig`] if the values fail [`validate`](Self::validate).
    pub fn from_json(json: &str) -> Result<Self, SceneError> {
        let config: SceneConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject surfaces with a zero dimension.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::InvalidConfig`] describing the offending field.
    pub fn validate(&self) -> Result<(), SceneError> {
        if self.width == 0 || self.height == 0 {
            return Err(SceneError::InvalidConfig {
                details: format!(
                    "surface must be non-empty, got {}x{}",
                    self.width, self.height
                ),
            });
        }
        Ok(())
    }
}

//! Engine configuration: the scene settings plus what the runner needs to
//! find its canvas, pace frames and filter logs.

use std::time::Duration;

use hv_scene::config::SceneConfig;
use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Everything needed to start the engine.
///
/// Scene fields sit at the top level of the JSON form next to the runner
/// fields:
///
/// ```
/// use hv_engine::config::EngineConfig;
///
/// let config = EngineConfig::from_json(r#"{"width": 320, "height": 200, "debug": true, "canvasId": "game"}"#).unwrap();
/// assert_eq!(config.scene.width, 320);
/// assert!(config.scene.debug);
/// assert_eq!(config.canvas_id, "game");
/// assert_eq!(config.max_frame_dt_ms, 250);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    #[serde(flatten)]
    pub scene: SceneConfig,
    /// DOM id of the target `<canvas>`.
    pub canvas_id: String,
    /// Upper bound on the time step fed to one frame, in milliseconds.
    /// Long gaps (background tabs, breakpoints) are clamped to this.
    pub max_frame_dt_ms: u64,
    /// Default `tracing` filter directive when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            scene: SceneConfig::default(),
            canvas_id: "canvas".to_owned(),
            max_frame_dt_ms: 250,
            log_filter: "info".to_owned(),
        }
    }
}

impl EngineConfig {
    /// Parse and validate a configuration from JSON. Missing fields take
    /// their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Scene`] for malformed JSON or bad scene values
    /// and [`EngineError::InvalidConfig`] for bad runner values.
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        let config: EngineConfig =
            serde_json::from_str(json).map_err(hv_scene::SceneError::from)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every field.
    ///
    /// # Errors
    ///
    /// See [`from_json`](Self::from_json).
    pub fn validate(&self) -> Result<(), EngineError> {
        self.scene.validate()?;
        if self.max_frame_dt_ms == 0 {
            return Err(EngineError::InvalidConfig {
                details: "maxFrameDtMs must be positive".to_owned(),
            });
        }
        if self.canvas_id.trim().is_empty() {
            return Err(EngineError::InvalidConfig {
                details: "canvasId must not be empty".to_owned(),
            });
        }
        Ok(())
    }

    /// [`max_frame_dt_ms`](Self::max_frame_dt_ms) as a `Duration`.
    pub fn max_frame_dt(&self) -> Duration {
        Duration::from_millis(self.max_frame_dt_ms)
    }
}

//! HV Engine -- frame-driven runner for [`hv_scene`] scenes.
//!
//! This crate wraps a [`Scene`](hv_scene::scene::Scene) in a [`FrameLoop`](frame::FrameLoop):
//! each frame advances flash timers by the time since the previous frame,
//! runs the registered per-frame systems in order and draws the scene onto a
//! [`Surface`](hv_scene::surface::Surface). With the `web` feature it also
//! provides the browser backend: a canvas surface and a
//! `requestAnimationFrame` driver.
//!
//! # Quick Start
//!
//! ```
//! use hv_engine::prelude::*;
//!
//! let config = EngineConfig::default();
//! let mut frame_loop = FrameLoop::from_config(&config);
//! let player = frame_loop
//!     .scene_mut()
//!     .spawn(SpriteOptions { width: 10, height: 10, ..Default::default() })
//!     .unwrap();
//!
//! frame_loop.add_system("walk", move |scene, _dt| {
//!     let _ = scene.move_sprite(player, Direction::Right, 1);
//! });
//!
//! let mut surface = RecordingSurface::new();
//! for i in 0..3 {
//!     frame_loop.frame(i as f64 * 16.0, &mut surface);
//! }
//! assert_eq!(frame_loop.frame_count(), 3);
//! assert_eq!(frame_loop.scene().sprite(player).unwrap().x, 3);
//! ```

#![deny(unsafe_code)]

pub mod config;
pub mod frame;
pub mod logging;

#[cfg(feature = "web")]
pub mod web;

/// Re-export the scene crate for convenience.
pub use hv_scene;

pub use hv_scene::util::ENGINE_VERSION;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors produced while configuring or starting the engine.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A scene operation failed.
    #[error(transparent)]
    Scene(#[from] hv_scene::SceneError),

    /// Engine configuration values out of range.
    #[error("invalid engine configuration: {details}")]
    InvalidConfig {
        details: String,
    },

    /// A browser global (window, document, 2d context) is unavailable.
    #[error("host is missing {what}")]
    MissingHost {
        what: &'static str,
    },

    /// No canvas element with the configured id.
    #[error("no <canvas> element with id '{id}'")]
    CanvasNotFound {
        id: String,
    },

    /// A host call threw.
    #[error("{context} failed: {message}")]
    Js {
        context: String,
        message: String,
    },
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common engine usage.
pub mod prelude {
    pub use hv_scene::prelude::*;

    pub use crate::config::EngineConfig;
    pub use crate::frame::{FrameLoop, FrameReport, SystemFn};
    pub use crate::EngineError;

    #[cfg(feature = "web")]
    pub use crate::web::{start, CanvasSurface, LoadedImage};
}

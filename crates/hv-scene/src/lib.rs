//! HV Scene -- retained-mode sprite scene with collision-gated movement.
//!
//! This crate is the platform-independent core of HV-Engine. It stores every
//! live [`Sprite`](sprite::Sprite) in a positional [`Registry`](registry::Registry)
//! whose slot index doubles as the sprite's draw depth, resolves movement of
//! solid sprites against the rest of the scene, and draws the scene each frame
//! onto any [`Surface`](surface::Surface) implementation.
//!
//! # Quick Start
//!
//! ```
//! use hv_scene::prelude::*;
//!
//! let mut scene = Scene::new(SceneConfig { width: 100, height: 100, ..Default::default() });
//!
//! let player = scene
//!     .spawn(SpriteOptions {
//!         x: 10,
//!         y: 10,
//!         width: 20,
//!         height: 20,
//!         solid: true,
//!         bound_to_viewport: true,
//!         ..Default::default()
//!     })
//!     .unwrap();
//!
//! // The far edge would reach the surface edge, so the move is rejected.
//! let outcome = scene.move_sprite(player, Direction::Right, 90).unwrap();
//! assert!(outcome.is_blocked());
//! assert_eq!(scene.sprite(player).unwrap().x, 10);
//! ```

#![deny(unsafe_code)]

pub mod collision;
pub mod color;
pub mod config;
pub mod debug;
pub mod flash;
pub mod registry;
pub mod render;
pub mod scene;
pub mod sprite;
pub mod surface;
pub mod util;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors produced by scene operations.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    /// The sprite handle is stale (slot overwritten or removed) or was never issued.
    #[error("sprite {sprite:?} does not exist (stale or never inserted)")]
    StaleSprite {
        sprite: registry::SpriteId,
    },

    /// Construction options describe geometry that cannot be drawn or collided.
    #[error("sprite '{name}' has invalid geometry: {details}")]
    InvalidGeometry {
        name: String,
        details: String,
    },

    /// The shape name in the options is not one the engine knows.
    #[error("sprite '{name}' has unknown shape '{shape}'. Known shapes: [rectangle, circle]")]
    UnknownShape {
        name: String,
        shape: String,
    },

    /// A flash period must be positive and finite.
    #[error("flash period must be positive and finite, got {seconds}s")]
    InvalidFlashPeriod {
        seconds: f64,
    },

    /// A sprite was placed deeper than the registry allows.
    #[error("sprite depth {depth} exceeds the maximum depth {max}")]
    InvalidDepth {
        depth: usize,
        max: usize,
    },

    /// Configuration values out of range.
    #[error("invalid scene configuration: {details}")]
    InvalidConfig {
        details: String,
    },

    /// Scene or sprite description could not be parsed.
    #[error("failed to parse scene description: {0}")]
    Json(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::collision::{colliding, Bounds};
    pub use crate::color::{normalize as color, Color};
    pub use crate::config::{SceneConfig, ShadowOrder};
    pub use crate::flash::Flash;
    pub use crate::registry::{Registry, SpriteId};
    pub use crate::render::FrameStats;
    pub use crate::scene::{Blocker, Direction, MoveOutcome, Scene};
    pub use crate::sprite::{
        Border, BorderOptions, Gradient, GradientKind, GradientOptions, ImageRef, Shadow,
        ShadowOptions, Shape, Sprite, SpriteOptions,
    };
    pub use crate::surface::{DrawOp, Paint, RecordingSurface, Surface};
    pub use crate::SceneError;
}

//! Variable-timestep frame loop.
//!
//! The [`FrameLoop`] drives a [`Scene`] once per host frame. Each frame:
//!
//! 1. The time step is computed from the host timestamp (0 on the first
//!    frame, clamped to the configured maximum).
//! 2. Flash timers advance by that step.
//! 3. All registered systems run in registration order, each with mutable
//!    access to the scene and the step.
//! 4. The scene is drawn onto the surface.
//!
//! Drawing failures are logged and reported, never fatal: the next frame
//! starts from a cleared surface anyway.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use hv_engine::frame::FrameLoop;
//! use hv_scene::prelude::*;
//!
//! let scene = Scene::new(SceneConfig::default());
//! let mut frame_loop = FrameLoop::new(scene, Duration::from_millis(100));
//! frame_loop.add_system("noop", |_scene, _dt| {});
//!
//! let mut surface = RecordingSurface::new();
//! frame_loop.frame(0.0, &mut surface);
//! let report = frame_loop.frame(1000.0, &mut surface);
//!
//! // A one second gap is clamped to the 100 ms maximum.
//! assert_eq!(report.dt, Duration::from_millis(100));
//! assert_eq!(frame_loop.frame_count(), 2);
//! ```

use std::time::Duration;

use hv_scene::render::FrameStats;
use hv_scene::scene::Scene;
use hv_scene::surface::Surface;

use crate::config::EngineConfig;

// ---------------------------------------------------------------------------
// SystemFn
// ---------------------------------------------------------------------------

/// A per-frame system.
///
/// Systems receive the scene and the frame's time step. Unlike simulation
/// ticks, frames are not fixed-length, so anything time-based should scale
/// by the step.
pub type SystemFn = Box<dyn FnMut(&mut Scene, Duration)>;

struct RegisteredSystem {
    name: String,
    func: SystemFn,
}

// ---------------------------------------------------------------------------
// FrameReport
// ---------------------------------------------------------------------------

/// What happened during one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    /// 1-based number of this frame.
    pub frame: u64,
    /// Time step fed to timers and systems.
    pub dt: Duration,
    /// Visibility toggles performed by flash timers.
    pub toggles: u32,
    /// Draw statistics, or `None` if the surface failed mid-frame.
    pub stats: Option<FrameStats>,
}

// ---------------------------------------------------------------------------
// FrameLoop
// ---------------------------------------------------------------------------

/// Owns a scene and advances it once per host frame.
pub struct FrameLoop {
    scene: Scene,
    systems: Vec<RegisteredSystem>,
    frame_counter: u64,
    /// Host timestamp of the previous frame, in milliseconds.
    last_timestamp: Option<f64>,
    max_frame_dt: Duration,
    /// Sum of all time steps so far.
    elapsed: Duration,
}

impl std::fmt::Debug for FrameLoop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameLoop")
            .field("scene", &self.scene)
            .field("systems", &self.system_names())
            .field("frame_counter", &self.frame_counter)
            .field("elapsed", &self.elapsed)
            .finish_non_exhaustive()
    }
}

impl FrameLoop {
    /// Create a frame loop around `scene`.
    ///
    /// # Panics
    ///
    /// Panics if `max_frame_dt` is zero.
    pub fn new(scene: Scene, max_frame_dt: Duration) -> Self {
        assert!(
            !max_frame_dt.is_zero(),
            "max_frame_dt must be positive, got {max_frame_dt:?}"
        );
        Self {
            scene,
            systems: Vec::new(),
            frame_counter: 0,
            last_timestamp: None,
            max_frame_dt,
            elapsed: Duration::ZERO,
        }
    }

    /// Create a frame loop with a fresh scene built from `config`.
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(Scene::new(config.scene.clone()), config.max_frame_dt())
    }

    /// Register a system to run every frame, after those registered before it.
    ///
    /// # Panics
    ///
    /// Panics if a system with the same name is already registered.
    pub fn add_system<F>(&mut self, name: &str, func: F)
    where
        F: FnMut(&mut Scene, Duration) + 'static,
    {
        assert!(
            !self.systems.iter().any(|s| s.name == name),
            "duplicate system name: {name:?}"
        );
        self.systems.push(RegisteredSystem {
            name: name.to_owned(),
            func: Box::new(func),
        });
    }

    /// Run one frame at host time `timestamp_ms` and draw it onto `surface`.
    pub fn frame<S: Surface>(&mut self, timestamp_ms: f64, surface: &mut S) -> FrameReport {
        let dt = self.step(timestamp_ms);
        self.elapsed += dt;

        let toggles = self.scene.advance(dt);

        for system in &mut self.systems {
            (system.func)(&mut self.scene, dt);
        }

        let stats = match self.scene.render(surface) {
            Ok(stats) => Some(stats),
            Err(err) => {
                tracing::warn!(frame = self.frame_counter + 1, error = ?err, "frame render failed");
                None
            }
        };

        self.frame_counter += 1;
        tracing::trace!(
            frame = self.frame_counter,
            dt_ms = dt.as_secs_f64() * 1000.0,
            toggles,
            "frame complete"
        );

        FrameReport {
            frame: self.frame_counter,
            dt,
            toggles,
            stats,
        }
    }

    /// Time since the previous frame, clamped. Non-finite or backwards
    /// timestamps count as no time passing.
    fn step(&mut self, timestamp_ms: f64) -> Duration {
        let previous = self.last_timestamp;
        if timestamp_ms.is_finite() {
            self.last_timestamp = Some(timestamp_ms);
        }
        let Some(previous) = previous else {
            return Duration::ZERO;
        };

        let gap_ms = timestamp_ms - previous;
        if !(gap_ms.is_finite() && gap_ms > 0.0) {
            return Duration::ZERO;
        }
        Duration::try_from_secs_f64(gap_ms / 1000.0)
            .unwrap_or(self.max_frame_dt)
            .min(self.max_frame_dt)
    }

    // -- accessors ----------------------------------------------------------

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// The number of frames run so far.
    pub fn frame_count(&self) -> u64 {
        self.frame_counter
    }

    /// Total time fed to the scene so far (sum of clamped steps).
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn max_frame_dt(&self) -> Duration {
        self.max_frame_dt
    }

    /// The names of all registered systems, in execution order.
    pub fn system_names(&self) -> Vec<&str> {
        self.systems.iter().map(|s| s.name.as_str()).collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

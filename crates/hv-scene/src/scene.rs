//! The scene: configuration, sprite registry and the operations that need
//! to see all of them at once (movement gating, flash timers, drawing).

use std::time::Duration;

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::config::SceneConfig;
use crate::registry::{Registry, SpriteId};
use crate::render::{self, FrameStats};
use crate::sprite::{Sprite, SpriteOptions};
use crate::surface::Surface;
use crate::util;
use crate::SceneError;

// ---------------------------------------------------------------------------
// Movement types
// ---------------------------------------------------------------------------

/// Direction of a single movement step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Left,
    Right,
    Down,
}

impl Direction {
    /// Unit step in surface coordinates (y grows downward).
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
        }
    }
}

/// What stopped a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Blocker {
    /// The first solid sprite the candidate position overlapped.
    Sprite(SpriteId),
    /// The surface edge of a viewport-bound sprite.
    Viewport,
}

/// Result of [`Scene::move_sprite`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved,
    Blocked { by: Blocker },
}

impl MoveOutcome {
    pub fn is_blocked(&self) -> bool {
        matches!(self, MoveOutcome::Blocked { .. })
    }
}

// ---------------------------------------------------------------------------
// Scene
// ---------------------------------------------------------------------------

/// A configured surface and every sprite on it.
#[derive(Debug)]
pub struct Scene {
    config: SceneConfig,
    registry: Registry,
    /// Drives debug outline colors and generated ids.
    rng: Pcg32,
    /// Sprites spawned so far, for default names.
    spawned: u64,
}

impl Scene {
    pub fn new(config: SceneConfig) -> Self {
        let rng = Pcg32::seed_from_u64(config.seed);
        Self {
            config,
            registry: Registry::new(),
            rng,
            spawned: 0,
        }
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Toggle the debug overlay.
    pub fn set_debug(&mut self, debug: bool) {
        self.config.debug = debug;
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    // -- lifecycle ----------------------------------------------------------

    /// Build a sprite from `options` and register it at `options.z`
    /// (appended when absent).
    ///
    /// Unnamed sprites are called `Sprite N`, counting every spawn on this
    /// scene from 1.
    ///
    /// # Errors
    ///
    /// Returns the validation error from [`Sprite::from_options`], or
    /// [`SceneError::InvalidDepth`] for a `z` past
    /// [`MAX_DEPTH`](crate::registry::MAX_DEPTH). Nothing is registered in
    /// either case.
    pub fn spawn(&mut self, options: SpriteOptions) -> Result<SpriteId, SceneError> {
        self.spawned += 1;
        let depth = options.z;
        let sprite = Sprite::from_options(options, &self.config, format!("Sprite {}", self.spawned))?;
        let name = sprite.name.clone();
        let (id, _) = self.registry.insert(sprite, depth)?;
        tracing::debug!(sprite = %name, id = %id, "sprite spawned");
        Ok(id)
    }

    /// Register an already-built sprite. See [`Registry::insert`].
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::InvalidDepth`] for a depth past the registry limit.
    pub fn insert(
        &mut self,
        sprite: Sprite,
        depth: Option<usize>,
    ) -> Result<(SpriteId, Option<Sprite>), SceneError> {
        self.registry.insert(sprite, depth)
    }

    pub fn sprite(&self, id: SpriteId) -> Option<&Sprite> {
        self.registry.get(id)
    }

    pub fn sprite_mut(&mut self, id: SpriteId) -> Option<&mut Sprite> {
        self.registry.get_mut(id)
    }

    /// Like [`sprite_mut`](Self::sprite_mut), but a stale handle is an error.
    pub fn expect_sprite_mut(&mut self, id: SpriteId) -> Result<&mut Sprite, SceneError> {
        self.registry
            .get_mut(id)
            .ok_or(SceneError::StaleSprite { sprite: id })
    }

    pub fn remove(&mut self, id: SpriteId) -> Option<Sprite> {
        self.registry.remove(id)
    }

    pub fn clear(&mut self) {
        self.registry.clear();
    }

    // -- movement -----------------------------------------------------------

    /// Move a sprite `amount` pixels in `direction`.
    ///
    /// Non-solid sprites always move. A solid sprite moves only if the
    /// candidate position overlaps no other solid sprite and, when it is
    /// bound to the viewport, stays inside the surface. Blocked moves leave
    /// the position untouched.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::StaleSprite`] if `id` does not refer to a live
    /// sprite.
    pub fn move_sprite(
        &mut self,
        id: SpriteId,
        direction: Direction,
        amount: i32,
    ) -> Result<MoveOutcome, SceneError> {
        let sprite = self
            .registry
            .get(id)
            .ok_or(SceneError::StaleSprite { sprite: id })?;

        let (dx, dy) = direction.delta();
        let new_x = sprite.x.saturating_add(dx.saturating_mul(amount));
        let new_y = sprite.y.saturating_add(dy.saturating_mul(amount));

        if sprite.solid {
            if let Some(by) = self.blocker(id, sprite, direction, new_x, new_y) {
                tracing::debug!(
                    sprite = %sprite.name,
                    ?direction,
                    amount,
                    ?by,
                    "move blocked"
                );
                return Ok(MoveOutcome::Blocked { by });
            }
        }

        if let Some(sprite) = self.registry.get_mut(id) {
            sprite.x = new_x;
            sprite.y = new_y;
        }
        Ok(MoveOutcome::Moved)
    }

    fn blocker(
        &self,
        id: SpriteId,
        sprite: &Sprite,
        direction: Direction,
        new_x: i32,
        new_y: i32,
    ) -> Option<Blocker> {
        let candidate = sprite.bounds_at(new_x, new_y);

        if let Some((other, _)) = self
            .registry
            .solid_excluding(id)
            .find(|(_, other)| crate::collision::colliding(&candidate, &other.bounds()))
        {
            return Some(Blocker::Sprite(other));
        }

        if !sprite.bound_to_viewport {
            return None;
        }
        let outside = match direction {
            Direction::Right => candidate.right() >= f64::from(self.config.width),
            Direction::Down => candidate.bottom() >= f64::from(self.config.height),
            Direction::Left => sprite.x == 0 || candidate.left() < 0.0,
            Direction::Up => sprite.y == 0 || candidate.top() < 0.0,
        };
        outside.then_some(Blocker::Viewport)
    }

    // -- time ---------------------------------------------------------------

    /// Advance every flash timer by `dt`. Returns the total number of
    /// visibility toggles performed.
    pub fn advance(&mut self, dt: Duration) -> u32 {
        self.registry
            .all_mut()
            .fold(0u32, |total, (_, sprite)| {
                total.saturating_add(sprite.advance_flash(dt))
            })
    }

    // -- images -------------------------------------------------------------

    /// Report that a sprite's image finished loading. Returns whether any
    /// dimension was inferred from it.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::StaleSprite`] for a dead handle.
    pub fn image_loaded(
        &mut self,
        id: SpriteId,
        natural_width: u32,
        natural_height: u32,
    ) -> Result<bool, SceneError> {
        Ok(self
            .expect_sprite_mut(id)?
            .image_loaded(natural_width, natural_height))
    }

    /// Report a loaded image to every sprite whose pending image is `src`.
    /// Returns how many sprites were updated.
    pub fn image_loaded_by_src(&mut self, src: &str, natural_width: u32, natural_height: u32) -> usize {
        let mut updated = 0;
        for (_, sprite) in self.registry.all_mut() {
            let waiting = sprite
                .image
                .as_ref()
                .is_some_and(|image| image.src == src && !image.is_loaded());
            if waiting {
                sprite.image_loaded(natural_width, natural_height);
                updated += 1;
            }
        }
        updated
    }

    /// Image sources some sprite is still waiting on, deduplicated, in slot
    /// order.
    pub fn pending_images(&self) -> Vec<String> {
        let mut pending: Vec<String> = Vec::new();
        for (_, sprite) in self.registry.all() {
            if let Some(image) = sprite.image.as_ref().filter(|image| !image.is_loaded()) {
                if !pending.contains(&image.src) {
                    pending.push(image.src.clone());
                }
            }
        }
        pending
    }

    // -- drawing ------------------------------------------------------------

    /// Draw one frame onto `surface`.
    pub fn render<S: Surface>(&mut self, surface: &mut S) -> Result<FrameStats, S::Error> {
        render::render_frame(surface, &mut self.registry, &self.config, &mut self.rng)
    }

    /// A fresh alphanumeric id of `len` characters from the scene's RNG.
    pub fn make_id(&mut self, len: usize) -> String {
        util::make_id(&mut self.rng, len)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

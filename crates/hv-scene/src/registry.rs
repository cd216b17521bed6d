//! Positional sprite storage and generational sprite handles.
//!
//! The [`Registry`] is a sparse vector of slots. A sprite's slot index is its
//! depth: inserting with an explicit depth writes that slot (growing the
//! store with empty holes as needed and displacing any occupant), inserting
//! without one appends after the last slot. Holes are skipped by every
//! iterator.
//!
//! A [`SpriteId`] packs a *generation* counter in the high 32 bits and the
//! slot index in the low 32 bits. A slot's generation is bumped every time
//! its occupant is displaced or removed, so handles to the old occupant go
//! stale immediately instead of silently aliasing the new one.

use std::cmp::Reverse;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::sprite::Sprite;
use crate::SceneError;

/// Deepest slot a sprite may occupy. Slots below it are allocated eagerly,
/// so the bound also caps the store's size.
pub const MAX_DEPTH: usize = u16::MAX as usize;

// ---------------------------------------------------------------------------
// SpriteId
// ---------------------------------------------------------------------------

/// A generational handle to a registered sprite.
///
/// Layout: `[generation: u32 | index: u32]`
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpriteId(u64);

impl SpriteId {
    /// Construct a `SpriteId` from a slot index and generation.
    #[inline]
    pub fn new(index: u32, generation: u32) -> Self {
        Self((generation as u64) << 32 | index as u64)
    }

    /// The slot index (low 32 bits), which is also the sprite's depth.
    #[inline]
    pub fn index(self) -> u32 {
        self.0 as u32
    }

    /// The generation (high 32 bits).
    #[inline]
    pub fn generation(self) -> u32 {
        (self.0 >> 32) as u32
    }

    #[inline]
    pub fn to_raw(self) -> u64 {
        self.0
    }

    #[inline]
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Debug for SpriteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SpriteId({}v{})", self.index(), self.generation())
    }
}

impl fmt::Display for SpriteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index(), self.generation())
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    sprite: Option<Sprite>,
}

/// Depth-indexed store of every live sprite.
///
/// The registry owns its sprites, so one sprite can never occupy two slots;
/// inserting a clone creates an independent sprite with its own handle.
#[derive(Debug, Default)]
pub struct Registry {
    slots: Vec<Slot>,
    /// Generation given to freshly created slots. Raised by [`clear`](Self::clear)
    /// so handles from before the clear never match a new slot.
    base_generation: u32,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `sprite` at `depth`, or append it when `depth` is `None`.
    ///
    /// Returns the new handle and the sprite previously occupying the slot,
    /// if any. The displaced sprite's handle is stale from now on.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::InvalidDepth`] if the target depth is above
    /// [`MAX_DEPTH`]; the registry is left untouched.
    pub fn insert(
        &mut self,
        sprite: Sprite,
        depth: Option<usize>,
    ) -> Result<(SpriteId, Option<Sprite>), SceneError> {
        let index = depth.unwrap_or(self.slots.len());
        let raw_index = u32::try_from(index)
            .ok()
            .filter(|_| index <= MAX_DEPTH)
            .ok_or(SceneError::InvalidDepth {
                depth: index,
                max: MAX_DEPTH,
            })?;
        if index >= self.slots.len() {
            let len = index.checked_add(1).ok_or(SceneError::InvalidDepth {
                depth: index,
                max: MAX_DEPTH,
            })?;
            let generation = self.base_generation;
            self.slots.resize_with(len, || Slot {
                generation,
                sprite: None,
            });
        }

        let slot = &mut self.slots[index];
        let displaced = slot.sprite.take();
        if let Some(old) = &displaced {
            slot.generation = slot.generation.wrapping_add(1);
            tracing::warn!(
                depth = index,
                displaced = %old.name,
                replacement = %sprite.name,
                "sprite inserted over an occupied depth; previous sprite displaced"
            );
        }
        slot.sprite = Some(sprite);

        Ok((SpriteId::new(raw_index, slot.generation), displaced))
    }

    /// Look up a live sprite.
    pub fn get(&self, id: SpriteId) -> Option<&Sprite> {
        self.slots
            .get(id.index() as usize)
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.sprite.as_ref())
    }

    /// Look up a live sprite mutably.
    pub fn get_mut(&mut self, id: SpriteId) -> Option<&mut Sprite> {
        self.slots
            .get_mut(id.index() as usize)
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.sprite.as_mut())
    }

    /// Returns `true` if `id` refers to a live sprite.
    pub fn contains(&self, id: SpriteId) -> bool {
        self.get(id).is_some()
    }

    /// Remove a sprite, leaving a hole at its depth.
    ///
    /// Returns `None` if the handle is stale.
    pub fn remove(&mut self, id: SpriteId) -> Option<Sprite> {
        let slot = self.slots.get_mut(id.index() as usize)?;
        if slot.generation != id.generation() {
            return None;
        }
        let sprite = slot.sprite.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        Some(sprite)
    }

    /// Drop every sprite and every slot. All outstanding handles go stale.
    pub fn clear(&mut self) {
        let highest = self
            .slots
            .iter()
            .map(|slot| slot.generation)
            .max()
            .unwrap_or(self.base_generation);
        self.base_generation = highest.max(self.base_generation).wrapping_add(1);
        self.slots.clear();
    }

    /// Number of live sprites (holes excluded).
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.sprite.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Length of the backing store, holes included. The next appended
    /// sprite lands at this depth.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Depth of a live sprite.
    pub fn depth_of(&self, id: SpriteId) -> Option<usize> {
        self.contains(id).then_some(id.index() as usize)
    }

    /// Live sprites in slot order.
    pub fn all(&self) -> impl Iterator<Item = (SpriteId, &Sprite)> + '_ {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.sprite
                .as_ref()
                .map(|sprite| (SpriteId::new(index as u32, slot.generation), sprite))
        })
    }

    /// Live sprites in slot order, mutably.
    pub fn all_mut(&mut self) -> impl Iterator<Item = (SpriteId, &mut Sprite)> + '_ {
        self.slots.iter_mut().enumerate().filter_map(|(index, slot)| {
            let generation = slot.generation;
            slot.sprite
                .as_mut()
                .map(|sprite| (SpriteId::new(index as u32, generation), sprite))
        })
    }

    /// Handles of all live sprites in slot order.
    pub fn ids(&self) -> Vec<SpriteId> {
        self.all().map(|(id, _)| id).collect()
    }

    /// Every solid sprite other than `id`, read at call time.
    pub fn solid_excluding(&self, id: SpriteId) -> impl Iterator<Item = (SpriteId, &Sprite)> + '_ {
        self.all()
            .filter(move |(other, sprite)| *other != id && sprite.solid)
    }

    /// Handles in draw order: depth descending, stable.
    pub fn draw_order(&self) -> Vec<SpriteId> {
        let mut ids = self.ids();
        ids.sort_by_key(|id| Reverse(id.index()));
        ids
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Shape overlap predicate used to gate movement of solid sprites.
//!
//! [`colliding`] is pure: it compares two [`Bounds`] and nothing else, so the
//! scene can describe where a sprite *would* be and test that candidate
//! against the current bounds of every other solid sprite.
//!
//! Rectangles are positioned by their top-left corner, circles by their
//! center. Touching edges do not count as overlap.

use serde::{Deserialize, Serialize};

use crate::sprite::Shape;

// ---------------------------------------------------------------------------
// Bounds
// ---------------------------------------------------------------------------

/// The collision footprint of a sprite at some position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub shape: Shape,
}

impl Bounds {
    /// An axis-aligned rectangle with its top-left corner at `(x, y)`.
    pub fn rect(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            shape: Shape::Rectangle,
        }
    }

    /// A circle centered at `(x, y)`.
    pub fn circle(x: f64, y: f64, radius: f64) -> Self {
        Self {
            x,
            y,
            width: radius * 2.0,
            height: radius * 2.0,
            shape: Shape::Circle { radius },
        }
    }

    /// Smallest x covered by the shape.
    pub fn left(&self) -> f64 {
        match self.shape {
            Shape::Rectangle => self.x,
            Shape::Circle { radius } => self.x - radius,
        }
    }

    /// Largest x covered by the shape.
    pub fn right(&self) -> f64 {
        match self.shape {
            Shape::Rectangle => self.x + self.width,
            Shape::Circle { radius } => self.x + radius,
        }
    }

    /// Smallest y covered by the shape.
    pub fn top(&self) -> f64 {
        match self.shape {
            Shape::Rectangle => self.y,
            Shape::Circle { radius } => self.y - radius,
        }
    }

    /// Largest y covered by the shape.
    pub fn bottom(&self) -> f64 {
        match self.shape {
            Shape::Rectangle => self.y + self.height,
            Shape::Circle { radius } => self.y + radius,
        }
    }
}

// ---------------------------------------------------------------------------
// Predicate
// ---------------------------------------------------------------------------

/// Whether `candidate` and `other` overlap.
///
/// Symmetric in its arguments. A shape with positive extent always collides
/// with itself.
pub fn colliding(candidate: &Bounds, other: &Bounds) -> bool {
    match (candidate.shape, other.shape) {
        (Shape::Rectangle, Shape::Rectangle) => rects_overlap(candidate, other),
        (Shape::Circle { radius: ra }, Shape::Circle { radius: rb }) => {
            let dx = candidate.x - other.x;
            let dy = candidate.y - other.y;
            let reach = ra + rb;
            dx * dx + dy * dy < reach * reach
        }
        (Shape::Circle { radius }, Shape::Rectangle) => {
            circle_overlaps_rect(candidate.x, candidate.y, radius, other)
        }
        (Shape::Rectangle, Shape::Circle { radius }) => {
            circle_overlaps_rect(other.x, other.y, radius, candidate)
        }
    }
}

fn rects_overlap(a: &Bounds, b: &Bounds) -> bool {
    !(a.right() <= b.left() || b.right() <= a.left() || a.bottom() <= b.top() || b.bottom() <= a.top())
}

fn circle_overlaps_rect(cx: f64, cy: f64, radius: f64, rect: &Bounds) -> bool {
    if radius <= 0.0 || rect.width <= 0.0 || rect.height <= 0.0 {
        return false;
    }
    // Closest point of the rectangle to the circle center.
    let nearest_x = cx.max(rect.left()).min(rect.right());
    let nearest_y = cy.max(rect.top()).min(rect.bottom());
    let dx = cx - nearest_x;
    let dy = cy - nearest_y;
    dx * dx + dy * dy < radius * radius
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

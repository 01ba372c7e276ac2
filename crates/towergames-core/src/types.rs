//! Fundamental geometric and simulation types.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Simulation time tracking. Time is counted in whole milliseconds of
/// simulated play so that cooldowns and spawn timelines are exact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each tick).
    pub tick: u64,
    /// Elapsed simulation time in milliseconds.
    pub elapsed_ms: u64,
}

impl SimTime {
    /// Advance by one tick of `dt_ms` milliseconds.
    pub fn advance(&mut self, dt_ms: u64) {
        self.tick += 1;
        self.elapsed_ms += dt_ms;
    }
}

/// Axis-aligned body reported by the physics collaborator.
///
/// `position` is the body center in world units (pixels), `velocity` is in
/// units per second.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub position: Vec2,
    pub velocity: Vec2,
    pub half_extents: Vec2,
}

impl Body {
    pub fn new(position: Vec2, half_extents: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            half_extents,
        }
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }
}

/// Faces of a body that are in solid contact with another body.
/// Naming follows screen space: `up` is toward negative y.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactFaces {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl ContactFaces {
    pub const NONE: ContactFaces = ContactFaces {
        left: false,
        right: false,
        up: false,
        down: false,
    };

    /// True if any face is touching.
    pub fn any(&self) -> bool {
        self.left || self.right || self.up || self.down
    }
}

/// Axis-aligned rectangle used by arena layouts (obstacles, bounds).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub center: Vec2,
    pub half_extents: Vec2,
}

impl Rect {
    pub fn new(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            center,
            half_extents,
        }
    }

    /// Whether a point lies inside the rectangle (edges inclusive).
    pub fn contains(&self, point: Vec2) -> bool {
        let d = (point - self.center).abs();
        d.x <= self.half_extents.x && d.y <= self.half_extents.y
    }
}

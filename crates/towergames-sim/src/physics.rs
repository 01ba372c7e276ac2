//! Physics collaborator boundary.
//!
//! The simulation only asks two questions of physics: do two bodies overlap,
//! and which faces are in solid contact. `ArcadePhysics` answers them with
//! axis-aligned boxes, enough for headless sessions and replays.

use glam::Vec2;

use towergames_core::types::{Body, ContactFaces};

pub trait Physics {
    /// True if the two bodies overlap (touching edges count).
    fn overlaps(&self, a: &Body, b: &Body) -> bool;

    /// Faces of `a` in solid contact with `b`.
    fn solid_contact(&self, a: &Body, b: &Body) -> ContactFaces;

    /// Move `mover` out of `fixed` after a blocking contact.
    fn separate(&self, mover: &Body, _fixed: &Body) -> Body {
        *mover
    }
}

/// Axis-aligned box physics.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArcadePhysics;

impl ArcadePhysics {
    /// Per-axis penetration depth; negative on an axis means a gap.
    fn penetration(a: &Body, b: &Body) -> Vec2 {
        let delta = (b.position - a.position).abs();
        a.half_extents + b.half_extents - delta
    }
}

impl Physics for ArcadePhysics {
    fn overlaps(&self, a: &Body, b: &Body) -> bool {
        let p = Self::penetration(a, b);
        p.x >= 0.0 && p.y >= 0.0
    }

    fn solid_contact(&self, a: &Body, b: &Body) -> ContactFaces {
        if !self.overlaps(a, b) {
            return ContactFaces::NONE;
        }
        let p = Self::penetration(a, b);
        let d = b.position - a.position;
        let mut faces = ContactFaces::NONE;
        if p.x <= p.y {
            if d.x >= 0.0 {
                faces.right = true;
            } else {
                faces.left = true;
            }
        } else if d.y >= 0.0 {
            faces.down = true;
        } else {
            faces.up = true;
        }
        faces
    }

    fn separate(&self, mover: &Body, fixed: &Body) -> Body {
        let p = Self::penetration(mover, fixed);
        if p.x <= 0.0 || p.y <= 0.0 {
            return *mover;
        }
        let mut out = *mover;
        let d = mover.position - fixed.position;
        if p.x <= p.y {
            out.position.x += if d.x >= 0.0 { p.x } else { -p.x };
            out.velocity.x = 0.0;
        } else {
            out.position.y += if d.y >= 0.0 { p.y } else { -p.y };
            out.velocity.y = 0.0;
        }
        out
    }
}

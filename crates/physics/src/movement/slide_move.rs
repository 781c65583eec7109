//! Collide-and-slide primitives.
//!
//! Every displacement the movement modes make goes through
//! [`MoveContext::safe_move`]: a capsule sweep that stops at the first
//! blocking contact and recovers from starting inside geometry. On top of
//! that, [`MoveContext::slide_along_surface`] redirects the unused part of a
//! blocked move along the surface, handling creases between two walls.

use glam::Vec3;
use log::trace;

use crate::collision::HitResult;

use super::config::{KINDA_SMALL_NUMBER, MIN_FLOOR_DIST, PENETRATION_PULLBACK};
use super::mode::MoveContext;
use super::state::MovementMode;
use super::vector::{flatten, is_nearly_zero};

/// Slides shorter than this are treated as no movement.
const MIN_SLIDE_LENGTH: f32 = 1.0e-3;

/// Clip velocity against a surface normal.
///
/// This removes the component of velocity going into the surface and
/// optionally adds a small "overbounce" to prevent sticking.
pub fn clip_velocity(velocity: Vec3, normal: Vec3, overbounce: f32) -> Vec3 {
    // Calculate how much velocity is going into the surface
    let backoff = velocity.dot(normal);

    // Adjust based on whether we're moving into or away from surface
    let adjusted_backoff = if backoff < 0.0 {
        backoff * overbounce
    } else {
        backoff / overbounce
    };

    // Remove the into-surface component
    velocity - normal * adjusted_backoff
}

/// The part of `delta` parallel to the surface, scaled by `time`.
pub fn compute_slide_vector(delta: Vec3, time: f32, normal: Vec3) -> Vec3 {
    clip_velocity(delta, normal, 1.0) * time
}

/// Redirect a slide that ran into a second surface.
///
/// In a crease (the two normals face each other) the move continues along
/// the crease line; otherwise it slides along the new surface, never back
/// against the original direction.
pub fn two_wall_adjust(delta: Vec3, hit: &HitResult, old_normal: Vec3) -> Vec3 {
    let hit_normal = hit.normal;

    if old_normal.dot(hit_normal) <= 0.0 {
        let crease = hit_normal.cross(old_normal).normalize_or_zero();
        let adjusted = crease * delta.dot(crease) * (1.0 - hit.time);
        // Don't let the crease push us backwards
        if delta.dot(adjusted) < 0.0 {
            -adjusted
        } else {
            adjusted
        }
    } else {
        let adjusted = compute_slide_vector(delta, 1.0 - hit.time, hit_normal);
        if adjusted.dot(delta) <= 0.0 {
            Vec3::ZERO
        } else if (hit_normal.dot(old_normal) - 1.0).abs() < KINDA_SMALL_NUMBER {
            // Same plane again: nudge off it
            adjusted + hit_normal * 0.01
        } else {
            adjusted
        }
    }
}

impl MoveContext<'_> {
    /// Sweep the capsule by `delta` and move it to where the sweep stopped.
    ///
    /// Starting inside geometry leaves the capsule where it was.
    pub fn move_capsule(&mut self, delta: Vec3) -> HitResult {
        let start = self.state.position;
        if delta.length_squared() <= f32::EPSILON {
            return HitResult::no_hit(start, start + delta);
        }

        let hit = self.world.sweep_capsule(
            start,
            start + delta,
            self.state.orientation,
            self.state.capsule,
            &self.filter,
        );

        if !hit.start_penetrating {
            self.state.position = hit.location;
        }
        hit
    }

    /// Move by `delta`, pushing out of any initial overlap and retrying once.
    pub fn safe_move(&mut self, delta: Vec3) -> HitResult {
        let hit = self.move_capsule(delta);
        if !hit.start_penetrating {
            return hit;
        }

        let adjustment = hit.normal * (hit.penetration_depth + PENETRATION_PULLBACK);
        if self.resolve_penetration(adjustment) {
            return self.move_capsule(delta);
        }
        hit
    }

    fn resolve_penetration(&mut self, adjustment: Vec3) -> bool {
        if is_nearly_zero(adjustment, KINDA_SMALL_NUMBER) {
            return false;
        }

        let candidate = self.state.position + adjustment;
        let overlap = self.world.sweep_capsule(
            candidate,
            candidate,
            self.state.orientation,
            self.state.capsule,
            &self.filter,
        );

        if overlap.start_penetrating {
            trace!("could not resolve penetration with {adjustment:?}");
            return false;
        }

        self.state.position = candidate;
        true
    }

    /// Slide the unused part of a blocked move along the surface.
    ///
    /// `hit` is updated with the last sweep made. Returns the fraction of
    /// `delta` that was applied.
    pub fn slide_along_surface(
        &mut self,
        delta: Vec3,
        time: f32,
        normal: Vec3,
        hit: &mut HitResult,
        handle_impact: bool,
    ) -> f32 {
        if !hit.blocking_hit {
            return 0.0;
        }

        let normal = self.walking_slide_normal(delta, normal, hit);

        let slide_delta = compute_slide_vector(delta, time, normal);
        if slide_delta.dot(delta) <= 0.0 || slide_delta.length() < MIN_SLIDE_LENGTH {
            return 0.0;
        }

        *hit = self.safe_move(slide_delta);
        let first_hit_time = hit.time;
        let mut percent_applied = first_hit_time;

        if hit.is_valid_blocking_hit() {
            if handle_impact {
                self.handle_impact(hit);
            }

            let adjusted = two_wall_adjust(slide_delta, hit, normal);
            if !is_nearly_zero(adjusted, MIN_SLIDE_LENGTH) && adjusted.dot(delta) > 0.0 {
                *hit = self.safe_move(adjusted);
                percent_applied += hit.time * (1.0 - first_hit_time);

                if handle_impact && hit.blocking_hit {
                    self.handle_impact(hit);
                }
            }
        }

        percent_applied.clamp(0.0, 1.0)
    }

    /// While walking, steep surfaces act as vertical walls and ceilings
    /// don't push the character into the floor.
    fn walking_slide_normal(&self, delta: Vec3, normal: Vec3, hit: &HitResult) -> Vec3 {
        if self.state.mode != MovementMode::Walking {
            return normal;
        }

        if normal.z > KINDA_SMALL_NUMBER {
            if !self.is_walkable(hit) {
                return flatten(normal).normalize_or_zero();
            }
        } else if normal.z < -KINDA_SMALL_NUMBER {
            let floor = &self.state.current_floor;
            if floor.floor_dist < MIN_FLOOR_DIST && floor.blocking_hit {
                let floor_normal = floor.normal();
                let floor_opposed = delta.dot(floor_normal) < 0.0 && floor_normal.z < 1.0 - 1.0e-5;
                let normal = if floor_opposed { floor_normal } else { normal };
                return flatten(normal).normalize_or_zero();
            }
        }

        normal
    }
}

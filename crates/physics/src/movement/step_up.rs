//! Climbing low obstacles while walking.
//!
//! A step-up is three sweeps: up by the step height, forward by the blocked
//! part of the move, then back down onto whatever is there. Any failed check
//! puts the capsule back exactly where it started.

use glam::{Quat, Vec3};
use log::trace;

use crate::collision::HitResult;

use super::config::MAX_FLOOR_DIST;
use super::floor::{is_within_edge_tolerance, FloorResult};
use super::mode::MoveContext;

/// Minimum `-impact_normal . gravity` of the original obstacle for the
/// character to be left standing on a step it has no floor under.
const MAX_STEP_SIDE_Z: f32 = 0.08;

/// A blocked forward move within a step-up that covers less than this is
/// treated as no progress.
const MIN_STEP_PROGRESS: f32 = 0.1;

/// Floor found on top of a successful step, so the caller can skip its own
/// floor query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepDownResult {
    pub floor: Option<FloorResult>,
}

/// Transform to restore when a step-up is abandoned.
#[derive(Debug, Clone, Copy)]
struct TransformSnapshot {
    position: Vec3,
    orientation: Quat,
}

impl MoveContext<'_> {
    /// Whether the character may try to climb onto whatever `hit` struck.
    pub fn can_step_up(&self, hit: &HitResult) -> bool {
        if !hit.is_valid_blocking_hit() || self.state.is_falling() {
            return false;
        }

        match hit.object {
            Some(object) => self.world.can_step_up_on(object) && self.world.can_be_base(object),
            None => true,
        }
    }

    /// Try to climb the obstacle in `hit` while moving by `delta`.
    ///
    /// On success the capsule rests on top of the step and `step_down`
    /// (when given) receives the floor found there. On failure the
    /// transform is bit-for-bit what it was before the call.
    pub fn step_up(
        &mut self,
        gravity_dir: Vec3,
        delta: Vec3,
        hit: &HitResult,
        step_down: Option<&mut StepDownResult>,
    ) -> bool {
        let max_step_height = self.config.max_step_height;
        if !self.can_step_up(hit) || max_step_height <= 0.0 {
            return false;
        }
        let Some(gravity_dir) = gravity_dir.try_normalize() else {
            return false;
        };

        let snapshot = TransformSnapshot {
            position: self.state.position,
            orientation: self.state.orientation,
        };
        let old_location = snapshot.position;
        let radius = self.state.capsule.radius;
        let half_height = self.state.capsule.half_height;

        // Don't bother stepping up if the top of the capsule is hitting something
        let initial_impact_z = hit.impact_point.z;
        if initial_impact_z > old_location.z + (half_height - radius) {
            trace!("step up rejected: impact {initial_impact_z:.2} above the capsule's lower hemisphere");
            return false;
        }

        let mut step_travel_up = max_step_height;
        let mut step_travel_down = max_step_height;
        let step_side_z = -hit.impact_normal.dot(gravity_dir);
        let mut floor_base_z = old_location.z - half_height;
        let mut floor_point_z = floor_base_z;

        let floor = &self.state.current_floor;
        if self.state.is_on_ground() && floor.is_walkable_floor() {
            // Steps are measured from the floor, not the floating capsule bottom
            let floor_dist = floor.distance_to_floor().max(0.0);
            floor_base_z -= floor_dist;
            step_travel_up = (step_travel_up - floor_dist).max(0.0);
            step_travel_down = max_step_height + MAX_FLOOR_DIST * 2.0;

            let hit_vertical_face = !is_within_edge_tolerance(hit.location, hit.impact_point, radius);
            if !floor.line_trace && !hit_vertical_face {
                floor_point_z = floor.hit.impact_point.z;
            } else {
                floor_point_z -= floor.floor_dist;
            }
        }

        // Nothing to climb if the impact is at or below our feet
        if initial_impact_z <= floor_base_z {
            trace!("step up rejected: impact below the floor base");
            return false;
        }

        // Up
        let sweep_up = self.move_capsule(-gravity_dir * step_travel_up);
        if sweep_up.start_penetrating {
            return self.reject_step_up(snapshot, "penetrating after moving up");
        }

        // Forward
        let mut forward_hit = self.move_capsule(delta);
        if forward_hit.blocking_hit {
            if forward_hit.start_penetrating {
                return self.reject_step_up(snapshot, "penetrating after moving forward");
            }

            if sweep_up.blocking_hit {
                self.handle_impact(&sweep_up);
            }
            self.handle_impact(&forward_hit);
            if self.state.is_falling() {
                return true;
            }

            let forward_hit_time = forward_hit.time;
            let forward_normal = forward_hit.normal;
            let before_slide = self.state.position;
            let forward_slide_amount = self.slide_along_surface(
                delta,
                1.0 - forward_hit.time,
                forward_normal,
                &mut forward_hit,
                true,
            );
            if self.state.is_falling() {
                return self.reject_step_up(snapshot, "started falling while sliding");
            }

            let slid = (self.state.position - before_slide).length();
            if forward_hit_time == 0.0 && (forward_slide_amount == 0.0 || slid < MIN_STEP_PROGRESS) {
                return self.reject_step_up(snapshot, "no forward progress");
            }
        }

        // Down
        let down_hit = self.move_capsule(gravity_dir * step_travel_down);
        if down_hit.start_penetrating {
            return self.reject_step_up(snapshot, "penetrating after moving down");
        }

        let mut result = StepDownResult::default();
        if down_hit.is_valid_blocking_hit() {
            let delta_z = down_hit.impact_point.z - floor_point_z;
            if delta_z > max_step_height {
                return self.reject_step_up(snapshot, "step too high");
            }

            // Unwalkable surfaces: don't step onto them if that would push us back or up
            if !self.is_walkable(&down_hit) {
                if delta.dot(down_hit.impact_normal) < 0.0 {
                    return self.reject_step_up(snapshot, "unwalkable surface facing the move");
                }
                if down_hit.location.z > old_location.z {
                    return self.reject_step_up(snapshot, "unwalkable surface above the start");
                }
            }

            if !is_within_edge_tolerance(down_hit.location, down_hit.impact_point, radius) {
                return self.reject_step_up(snapshot, "landed on the edge of the step");
            }

            if delta_z > 0.0 && !self.can_step_up(&down_hit) {
                return self.reject_step_up(snapshot, "surface can't be stepped on");
            }

            if step_down.is_some() {
                let floor = self.find_floor(self.state.position);

                // Raised onto something we can't perch on, from a surface that
                // was barely a step
                if down_hit.location.z > old_location.z
                    && !floor.blocking_hit
                    && step_side_z < MAX_STEP_SIDE_Z
                {
                    return self.reject_step_up(snapshot, "no floor on top of the step");
                }

                result.floor = Some(floor);
            }
        }

        if let Some(step_down) = step_down {
            *step_down = result;
        }
        true
    }

    fn reject_step_up(&mut self, snapshot: TransformSnapshot, reason: &str) -> bool {
        trace!("step up rejected: {reason}");
        self.state.position = snapshot.position;
        self.state.orientation = snapshot.orientation;
        false
    }
}

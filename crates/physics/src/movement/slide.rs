//! Crouch-sliding: slide velocity model and the sliding move.
//!
//! A slide starts when a crouching character is moving fast on a slidable
//! floor. Gravity pulls it down the slope in proportion to how steep the
//! slope is between flat and the slidable limit; on flat ground friction
//! bleeds the speed off until the slide ends.

use glam::Vec3;

use super::config::MovementConfig;
use super::floor::FloorResult;
use super::mode::MoveContext;
use super::vector::{is_nearly_zero, project_onto, project_onto_plane, safe_normal_2d, size_2d};

/// Velocity within this dot of perpendicular to the downhill direction
/// gets friction.
const SLIDE_FRICTION_DOT: f32 = 0.1;

/// Per-component tolerance for "gravity isn't pulling us anywhere".
const SLIDE_GRAVITY_TOLERANCE: f32 = 4.0;

/// A blocking floor no steeper than the slidable limit.
pub fn can_slide_on_surface(floor: &FloorResult, slidable_floor_z: f32) -> bool {
    floor.blocking_hit && floor.normal().z >= slidable_floor_z
}

/// New velocity after `dt` seconds of sliding on a floor with `normal`,
/// plus the downhill gravity acceleration that went into it.
pub fn calculate_slide_velocity(
    config: &MovementConfig,
    velocity: Vec3,
    input: Vec3,
    normal: Vec3,
    dt: f32,
) -> (Vec3, Vec3) {
    let downhill = project_onto_plane(Vec3::NEG_Z, normal).normalize_or_zero();

    // 0 on flat ground, 1 on the steepest slidable slope
    let steepness = ((1.0 - normal.z) / (1.0 - config.slidable_floor_z)).clamp(0.0, 1.0);
    let gravity_accel = downhill * config.slide_gravity_acceleration * steepness;

    let velocity_dir = velocity.normalize_or_zero();
    let velocity_dir_2d = safe_normal_2d(velocity);

    // Friction only while moving across (or without) the slope
    let friction = if downhill.dot(velocity_dir).abs() <= SLIDE_FRICTION_DOT {
        -velocity_dir_2d * size_2d(velocity) * config.slide_friction_factor * (1.0 - steepness)
    } else {
        Vec3::ZERO
    };

    let input_dot = velocity_dir_2d.dot(safe_normal_2d(input));
    let input_brake = if input_dot <= config.slide_input_brake_threshold {
        velocity_dir * input_dot * config.slide_braking_deceleration
    } else {
        Vec3::ZERO
    };

    let lateral = velocity_dir_2d.cross(Vec3::Z);
    let steering = project_onto(input, lateral) * config.slide_lateral_acceleration;

    let velocity = velocity + (gravity_accel + friction + input_brake + steering) * dt;
    (velocity, gravity_accel)
}

impl MoveContext<'_> {
    /// Whether walking on `floor` right now should turn into a slide.
    pub fn can_begin_sliding(&self, floor: &FloorResult) -> bool {
        self.state.crouch.wants_to_crouch
            && can_slide_on_surface(floor, self.config.slidable_floor_z)
            && self.state.velocity.length_squared()
                >= self.config.start_slide_speed_minimum * self.config.start_slide_speed_minimum
    }

    /// One sliding step of `delta_time` seconds.
    pub fn perform_slide(&mut self, delta_time: f32) {
        if delta_time <= 0.0 {
            return;
        }

        if self.consume_jump_input() && self.can_jump() {
            self.do_jump();
            self.continue_movement(delta_time);
            return;
        }

        self.tick_crouch(delta_time);

        let old_location = self.state.position;
        let could_walk_before = self.state.slide_floor.is_walkable_floor();
        let mut remaining_time = delta_time;
        let mut gravity_accel = Vec3::ZERO;

        for _ in 0..self.config.max_slide_iterations {
            if remaining_time <= 0.0 {
                break;
            }

            let normal = self.state.slide_floor.normal();
            let (velocity, gravity) =
                calculate_slide_velocity(self.config, self.state.velocity, self.input, normal, remaining_time);
            self.state.velocity = velocity;
            gravity_accel = gravity;

            let mut hit = self.state.slide_floor.hit.clone();
            let applied =
                self.slide_along_surface(velocity * remaining_time, 1.0, normal, &mut hit, true);
            remaining_time -= remaining_time * applied;
        }

        let slide_floor = self.find_floor(self.state.position);
        if !could_walk_before && slide_floor.is_walkable_floor() {
            self.notify_landed(slide_floor.hit.clone());
        }
        self.state.slide_floor = slide_floor;

        let elapsed = delta_time - remaining_time;
        if elapsed > 0.0 {
            self.state.velocity = (self.state.position - old_location) / elapsed;
        }

        let threshold = self.config.slide_speed_threshold;
        let too_slow = is_nearly_zero(gravity_accel, SLIDE_GRAVITY_TOLERANCE)
            && size_2d(self.state.velocity) <= threshold;
        let stop = !self.state.crouch.wants_to_crouch
            || !can_slide_on_surface(&self.state.slide_floor, self.config.slidable_floor_z)
            || too_slow;

        if !stop {
            return;
        }

        if self.state.slide_floor.is_walkable_floor() {
            self.state.current_floor = self.state.slide_floor.clone();
            self.start_ground_movement();
        } else {
            self.start_falling();
        }
        self.continue_movement(remaining_time);
    }
}

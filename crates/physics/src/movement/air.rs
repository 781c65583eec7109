//! Falling: air-control velocity model and the falling move.
//!
//! Air control is split into a forward and a lateral part relative to the
//! facing direction:
//! - Forward speed is capped by how fast the fall started, so a standing
//!   jump can't build up running speed in the air
//! - Strafing keeps whatever lateral speed is larger, input or momentum
//! - Pulling against the current velocity brakes instead of accelerating
//! - Turning toward the strafe side gets an acceleration bonus

use glam::Vec3;

use super::config::{MovementConfig, KINDA_SMALL_NUMBER};
use super::mode::MoveContext;
use super::vector::{flatten, is_nearly_zero, lerp, project_onto, safe_normal_2d, size_2d};

/// Dot product below which input counts as pulling against the velocity.
const AIR_BRAKE_DOT: f32 = -0.1;

/// Orientation and gravity the air model runs against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AirControl {
    /// Facing direction.
    pub forward: Vec3,
    /// Right of the facing direction.
    pub right: Vec3,
    /// Horizontal velocity when the fall began.
    pub initial_jump_velocity: Vec3,
    /// Gravity along Z (negative pulls down).
    pub gravity_z: f32,
    /// Maximum falling speed.
    pub terminal_velocity: f32,
}

/// New velocity after one tick of air control and gravity.
pub fn calculate_fall_velocity(
    config: &MovementConfig,
    velocity: Vec3,
    input: Vec3,
    air: &AirControl,
    dt: f32,
) -> Vec3 {
    let forward = air.forward;
    let right = air.right;

    let lateral_input = project_onto(input, right);
    let forward_velocity = project_onto(velocity, forward);
    let lateral_velocity = project_onto(velocity, right);

    // Don't allow accelerating past the speed the fall started with
    let max_forward_speed = config
        .max_air_speed
        .min(size_2d(air.initial_jump_velocity).max(config.max_air_speed * 0.2));

    let no_input = is_nearly_zero(input, KINDA_SMALL_NUMBER);
    let target_forward = if no_input {
        forward_velocity
    } else {
        project_onto(input, forward) * max_forward_speed
    };

    let target_lateral = if no_input {
        lateral_velocity
    } else {
        let wanted = lateral_input * config.max_air_strafe;
        safe_normal_2d(wanted) * wanted.length().max(lateral_velocity.length())
    };

    let target = target_forward + target_lateral + Vec3::NEG_Z * air.terminal_velocity;
    let mut acceleration = target - velocity;
    let input_dir = safe_normal_2d(input);

    let forward_part = safe_normal_2d(project_onto(acceleration, forward));
    let forward_dot = forward_part.dot(input_dir);
    let forward_accel = if forward_dot <= AIR_BRAKE_DOT {
        forward_part * config.air_braking_deceleration * -forward_dot
    } else {
        // Bonus for swinging the velocity around toward the strafe side
        let turn = forward.cross(safe_normal_2d(velocity)).length()
            * safe_normal_2d(air.initial_jump_velocity)
                .dot(-lateral_input)
                .max(0.0);
        forward_part * config.air_acceleration * lerp(1.0, config.air_turn_bonus_max, turn)
    };

    let lateral_part = safe_normal_2d(project_onto(acceleration, right));
    let lateral_dot = lateral_part.dot(input_dir);
    let lateral_accel = if lateral_dot <= AIR_BRAKE_DOT {
        lateral_part * config.air_braking_deceleration * -lateral_dot
    } else {
        lateral_part * config.air_acceleration
    };

    let mut velocity = velocity;
    let mut velocity_delta = forward_accel + lateral_accel;

    if !is_nearly_zero(safe_normal_2d(acceleration), KINDA_SMALL_NUMBER) {
        let horizontal = flatten(velocity);
        velocity -= (horizontal - safe_normal_2d(velocity_delta) * horizontal.length())
            * (dt * config.air_friction_factor).min(1.0);
        acceleration = target - velocity;
    }

    // Don't overshoot the target
    let remaining = size_2d(acceleration);
    let wanted = size_2d(velocity_delta);
    if wanted > remaining && wanted > 0.0 {
        velocity_delta *= remaining / wanted;
    }

    velocity_delta.z = air.gravity_z;
    velocity += velocity_delta * dt;
    velocity.z = velocity.z.max(-air.terminal_velocity);
    velocity
}

impl MoveContext<'_> {
    pub fn air_control(&self) -> AirControl {
        AirControl {
            forward: self.state.forward(),
            right: self.state.right(),
            initial_jump_velocity: self.state.initial_jump_velocity,
            gravity_z: self.gravity_z(),
            terminal_velocity: self.volume.terminal_velocity(),
        }
    }

    /// One falling step of `delta_time` seconds.
    pub fn perform_fall(&mut self, delta_time: f32) {
        if delta_time <= 0.0 {
            return;
        }

        self.state.time_in_air += delta_time;

        if self.consume_jump_input() && self.can_jump() {
            self.do_jump();
        }

        self.tick_crouch(delta_time);

        let air = self.air_control();
        self.state.velocity =
            calculate_fall_velocity(self.config, self.state.velocity, self.input, &air, delta_time);

        let mut old_location = self.state.position;
        let move_delta = self.state.velocity * delta_time;
        let mut hit = self.safe_move(move_delta);

        if !hit.is_valid_blocking_hit() {
            return;
        }

        if hit.time > 0.0 {
            self.state.velocity = (self.state.position - old_location) / (hit.time * delta_time);
        }

        if self.is_walkable(&hit) || self.should_check_for_valid_landing_spot(&hit) {
            let floor = self.find_floor(self.state.position);
            if self.can_begin_sliding(&floor) {
                self.start_sliding(floor);
                return;
            }
            if floor.is_walkable_floor() {
                self.state.current_floor = floor;
                self.start_ground_movement();
                return;
            }
        }

        // Not a landing: slide along whatever we hit with the rest of the move
        self.handle_impact(&hit);
        old_location = self.state.position;
        let time_remaining = 1.0 - hit.time;
        let normal = hit.normal;
        self.slide_along_surface(move_delta * time_remaining, 1.0, normal, &mut hit, true);

        if hit.time > 0.0 && time_remaining > 0.0 {
            self.state.velocity =
                (self.state.position - old_location) / (time_remaining * hit.time * delta_time);
        }
    }
}

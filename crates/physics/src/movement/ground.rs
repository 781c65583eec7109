//! Walking: ground velocity model and the walking move.
//!
//! Ground movement accelerates the horizontal velocity toward the input
//! direction at the mode's max speed, brakes when input stops or asks for
//! less speed, and keeps the capsule glued to ramps and low steps.

use glam::Vec3;

use super::config::{MovementConfig, KINDA_SMALL_NUMBER};
use super::mode::MoveContext;
use super::step_up::StepDownResult;
use super::vector::{flatten, is_nearly_zero, safe_normal_2d, size_2d};

/// New velocity after one tick of ground acceleration or braking.
///
/// The change in horizontal velocity never exceeds the applicable rate
/// (`walk_acceleration` or `braking_deceleration_walking`) times `dt`, and
/// the vertical component is left untouched.
pub fn calculate_ground_velocity(
    config: &MovementConfig,
    velocity: Vec3,
    input: Vec3,
    is_sprinting: bool,
    crouch_fraction: f32,
    dt: f32,
) -> Vec3 {
    if is_nearly_zero(input, KINDA_SMALL_NUMBER) && is_nearly_zero(velocity, KINDA_SMALL_NUMBER) {
        return velocity;
    }

    let start = velocity;
    let mut velocity = velocity;
    let speed_2d = size_2d(velocity);

    let max_speed = config.max_ground_speed(is_sprinting, crouch_fraction);
    let target = safe_normal_2d(input) * max_speed;
    let mut acceleration = target - flatten(velocity);
    if is_nearly_zero(acceleration, KINDA_SMALL_NUMBER) {
        return velocity;
    }

    let decelerating = is_nearly_zero(input, KINDA_SMALL_NUMBER)
        || target.length_squared() < speed_2d * speed_2d;

    let rate = if decelerating {
        config.braking_deceleration_walking
    } else {
        // Bend the current velocity toward the wanted direction
        let bend = (flatten(velocity) - safe_normal_2d(acceleration) * speed_2d)
            * (dt * config.ground_turn_rate).min(1.0);
        velocity -= bend;
        acceleration = target - flatten(velocity);
        config.walk_acceleration
    };

    let budget = rate * dt;
    let mut delta = safe_normal_2d(acceleration) * budget;
    let remaining = size_2d(acceleration);
    if size_2d(delta) > remaining {
        delta = safe_normal_2d(acceleration) * remaining;
    }
    velocity += delta;

    // Turning and accelerating together still respect the rate
    let change = flatten(velocity - start);
    if change.length() > budget {
        let clamped = start + change.clamp_length_max(budget);
        velocity.x = clamped.x;
        velocity.y = clamped.y;
    }

    velocity
}

/// Bend a horizontal move so it follows a ramp with the given normal.
pub fn project_onto_ramp(delta: Vec3, normal: Vec3) -> Vec3 {
    let flat = flatten(delta);
    if normal.z <= KINDA_SMALL_NUMBER {
        return flat;
    }
    Vec3::new(flat.x, flat.y, -flat.dot(normal) / normal.z)
}

impl MoveContext<'_> {
    /// Sprint needs a standing, grounded character pushing roughly forward.
    pub fn can_sprint(&self) -> bool {
        if self.state.crouch.wants_to_crouch || !self.state.is_on_ground() {
            return false;
        }
        let input_dir = self.input.normalize_or_zero();
        input_dir.dot(self.state.forward()) >= self.config.sprint_input_alignment
    }

    /// Start or stop sprinting from the current request and input.
    pub fn update_sprint(&mut self) {
        let can_sprint = self.can_sprint();
        if self.state.is_sprinting {
            if !self.state.wants_to_sprint || !can_sprint {
                self.set_sprinting(false);
            }
        } else if self.state.wants_to_sprint && can_sprint {
            self.set_sprinting(true);
        }
    }

    /// One walking step of `delta_time` seconds.
    pub fn perform_walk(&mut self, delta_time: f32) {
        if delta_time <= 0.0 {
            return;
        }

        self.update_sprint();

        if self.consume_jump_input() && self.can_jump() {
            self.do_jump();
            self.continue_movement(delta_time);
            return;
        }

        if self.can_begin_sliding(&self.state.current_floor) {
            let floor = self.state.current_floor.clone();
            self.start_sliding(floor);
            self.continue_movement(delta_time);
            return;
        }

        self.tick_crouch(delta_time);

        let old_location = self.state.position;
        self.state.velocity = calculate_ground_velocity(
            self.config,
            self.state.velocity,
            self.input,
            self.state.is_sprinting,
            self.state.crouch.crouch_fraction,
            delta_time,
        );

        let initial_delta = flatten(self.state.velocity) * delta_time;
        let mut move_delta = initial_delta;

        // Follow the ramp we're standing on
        let floor = &self.state.current_floor;
        if floor.is_walkable_floor() && floor.normal().z < 1.0 && self.is_walkable(&floor.hit) {
            move_delta = project_onto_ramp(move_delta, floor.normal());
        }

        if is_nearly_zero(move_delta, KINDA_SMALL_NUMBER) {
            return;
        }

        let mut step_down = StepDownResult::default();
        let mut hit = self.safe_move(move_delta);

        if hit.start_penetrating {
            let normal = hit.impact_normal;
            self.slide_along_surface(move_delta, 1.0, normal, &mut hit, true);
        } else if hit.is_valid_blocking_hit() {
            let mut percent_applied = hit.time;

            // Hit a walkable ramp: continue up it
            if hit.time > 0.0 && hit.normal.z > KINDA_SMALL_NUMBER && self.is_walkable(&hit) {
                let remaining = 1.0 - percent_applied;
                move_delta = project_onto_ramp(initial_delta * remaining, hit.normal);
                hit = self.safe_move(move_delta);
                percent_applied = (percent_applied + hit.time * remaining).clamp(0.0, 1.0);
            }

            if hit.is_valid_blocking_hit() {
                let blocked_delta = move_delta * (1.0 - percent_applied);
                let stepped = self.can_step_up(&hit)
                    && self.step_up(Vec3::NEG_Z, blocked_delta, &hit, Some(&mut step_down));

                if !stepped {
                    self.handle_impact(&hit);
                    let normal = hit.normal;
                    self.slide_along_surface(move_delta, 1.0 - percent_applied, normal, &mut hit, true);
                }
            }
        }

        let displacement = self.state.position - old_location;
        self.state.velocity = flatten(displacement / delta_time);

        self.state.current_floor = match step_down.floor.take() {
            Some(floor) => floor,
            None => self.find_floor(self.state.position),
        };

        if self.state.current_floor.is_walkable_floor() {
            self.adjust_floor_height();
        } else {
            self.start_falling();
        }
    }
}

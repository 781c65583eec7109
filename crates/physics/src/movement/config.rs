//! Movement configuration constants.
//!
//! All movement parameters are grouped here for easy tuning.
//! Distances are centimeters, times are seconds, Z is up.

use serde::{Deserialize, Serialize};

use crate::collision::CapsuleShape;
use crate::error::ConfigError;

/// Minimum distance the capsule floats above a walkable floor.
pub const MIN_FLOOR_DIST: f32 = 1.9;

/// Maximum distance the capsule floats above a walkable floor.
pub const MAX_FLOOR_DIST: f32 = 2.4;

/// Radius reduction for floor and uncrouch sweeps, so walls beside the
/// capsule are not mistaken for floor or ceiling.
pub const CAPSULE_RADIUS_SHRINK: f32 = 0.4;

/// Hits closer than this to the capsule rim are ignored for floor checks.
pub const SWEEP_EDGE_REJECT_DISTANCE: f32 = 0.15;

/// Extra distance added when pushing out of an initial penetration.
pub const PENETRATION_PULLBACK: f32 = 0.125;

pub const KINDA_SMALL_NUMBER: f32 = 1.0e-4;

/// Configuration for character movement physics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    // ========================================================================
    // Capsule and View
    // ========================================================================
    /// Capsule radius. Fixed once the character exists.
    pub capsule_radius: f32,

    /// Standing capsule half-height, hemisphere included.
    pub capsule_half_height: f32,

    /// Crouched capsule half-height.
    pub crouched_half_height: f32,

    /// Eye height above the capsule center when standing.
    pub eye_height: f32,

    /// Eye height above the capsule center when fully crouched.
    pub crouched_eye_height: f32,

    // ========================================================================
    // Walking
    // ========================================================================
    /// Acceleration toward the target ground velocity (cm/s²).
    pub walk_acceleration: f32,

    /// Deceleration when input is released or the target is slower (cm/s²).
    pub braking_deceleration_walking: f32,

    pub max_walk_speed: f32,

    pub max_sprint_speed: f32,

    /// Max ground speed when fully crouched.
    pub max_speed_crouched: f32,

    /// Steepest walkable slope, in degrees. Kept in sync with `walkable_floor_z`.
    pub walkable_floor_angle: f32,

    /// Minimum floor normal Z to walk on (cos of `walkable_floor_angle`).
    pub walkable_floor_z: f32,

    /// Tallest obstacle the character steps over.
    pub max_step_height: f32,

    /// Minimum dot between input and facing needed to sprint.
    pub sprint_input_alignment: f32,

    /// How strongly current velocity is bent toward the input direction while
    /// accelerating. `1.0` rotates at the classic rate, `0.0` disables it.
    pub ground_turn_rate: f32,

    // ========================================================================
    // Sliding
    // ========================================================================
    /// Steepest slidable slope, in degrees. Kept in sync with `slidable_floor_z`.
    pub slidable_floor_angle: f32,

    /// Minimum floor normal Z to slide on.
    pub slidable_floor_z: f32,

    /// Speed needed to start a slide.
    pub start_slide_speed_minimum: f32,

    /// Horizontal speed below which a slide on a flat surface ends.
    pub slide_speed_threshold: f32,

    /// Acceleration down a slope at the slidable limit (cm/s²).
    pub slide_gravity_acceleration: f32,

    /// Friction applied while sliding across a slope rather than down it.
    pub slide_friction_factor: f32,

    /// Deceleration when input opposes the slide.
    pub slide_braking_deceleration: f32,

    /// Steering acceleration from sideways input while sliding.
    pub slide_lateral_acceleration: f32,

    /// Input/velocity dot at or below which input brakes the slide.
    pub slide_input_brake_threshold: f32,

    /// Collide-and-slide passes per tick while sliding.
    pub max_slide_iterations: u32,

    // ========================================================================
    // Falling
    // ========================================================================
    pub max_air_speed: f32,

    /// Max sideways air speed reachable from input.
    pub max_air_strafe: f32,

    pub air_acceleration: f32,

    /// Deceleration when air input opposes current motion.
    pub air_braking_deceleration: f32,

    /// How fast horizontal velocity bends toward the air acceleration.
    pub air_friction_factor: f32,

    /// Max multiplier on forward air acceleration when turning off a jump.
    pub air_turn_bonus_max: f32,

    /// Multiplier on the physics volume's gravity.
    pub gravity_scale: f32,

    /// Vertical launch speed of a jump.
    pub jump_z_velocity: f32,

    /// Time after leaving the ground during which a jump is still allowed.
    pub jump_grace_period: f32,

    // ========================================================================
    // Crouching
    // ========================================================================
    /// Time to go from standing to fully crouched.
    pub time_to_crouch: f32,

    /// Time to crouch while sliding.
    pub time_to_crouch_sliding: f32,

    /// Whether crouch progress may advance while sliding.
    pub allow_crouch_while_sliding: bool,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            // Capsule
            capsule_radius: 34.0,
            capsule_half_height: 88.0,
            crouched_half_height: 40.0,
            eye_height: 64.0,
            crouched_eye_height: 40.0,

            // Walking
            walk_acceleration: 1024.0,
            braking_deceleration_walking: 1024.0,
            max_walk_speed: 600.0,
            max_sprint_speed: 750.0,
            max_speed_crouched: 300.0,
            walkable_floor_angle: angle_from_z(0.71),
            walkable_floor_z: 0.71,
            max_step_height: 45.0,
            sprint_input_alignment: 0.6,
            ground_turn_rate: 1.0,

            // Sliding
            slidable_floor_angle: angle_from_z(0.31),
            slidable_floor_z: 0.31,
            start_slide_speed_minimum: 500.0,
            slide_speed_threshold: 200.0,
            slide_gravity_acceleration: 980.0,
            slide_friction_factor: 1.5,
            slide_braking_deceleration: 600.0,
            slide_lateral_acceleration: 300.0,
            slide_input_brake_threshold: -0.45,
            max_slide_iterations: 3,

            // Falling
            max_air_speed: 1200.0,
            max_air_strafe: 300.0,
            air_acceleration: 600.0,
            air_braking_deceleration: 800.0,
            air_friction_factor: 1.0,
            air_turn_bonus_max: 3.0,
            gravity_scale: 1.0,
            jump_z_velocity: 420.0,
            jump_grace_period: 0.35,

            // Crouching
            time_to_crouch: 0.3,
            time_to_crouch_sliding: 0.15,
            allow_crouch_while_sliding: false,
        }
    }
}

impl MovementConfig {
    /// Create a "fast arcade" movement config.
    pub fn arcade() -> Self {
        Self {
            max_walk_speed: 700.0,
            max_sprint_speed: 950.0,
            walk_acceleration: 2048.0,
            braking_deceleration_walking: 2048.0,
            max_air_strafe: 500.0,
            air_acceleration: 1200.0, // More air control for strafing
            jump_z_velocity: 520.0,
            jump_grace_period: 0.5,
            allow_crouch_while_sliding: true,
            ..Default::default()
        }
    }

    /// Create a "tactical" movement config (slower, heavier).
    pub fn tactical() -> Self {
        Self {
            max_walk_speed: 450.0,
            max_sprint_speed: 600.0,
            max_speed_crouched: 200.0,
            walk_acceleration: 900.0,
            braking_deceleration_walking: 1400.0,
            max_air_strafe: 150.0,
            air_acceleration: 300.0,
            jump_z_velocity: 360.0,
            start_slide_speed_minimum: 550.0,
            time_to_crouch: 0.4,
            ..Default::default()
        }
    }

    /// Set the steepest walkable slope in degrees.
    pub fn set_walkable_floor_angle(&mut self, degrees: f32) {
        self.walkable_floor_angle = degrees;
        self.walkable_floor_z = degrees.to_radians().cos();
    }

    /// Set the walkable threshold directly as a normal Z.
    pub fn set_walkable_floor_z(&mut self, z: f32) {
        self.walkable_floor_z = z;
        self.walkable_floor_angle = angle_from_z(z);
    }

    /// Set the steepest slidable slope in degrees.
    pub fn set_slidable_floor_angle(&mut self, degrees: f32) {
        self.slidable_floor_angle = degrees;
        self.slidable_floor_z = degrees.to_radians().cos();
    }

    pub fn set_slidable_floor_z(&mut self, z: f32) {
        self.slidable_floor_z = z;
        self.slidable_floor_angle = angle_from_z(z);
    }

    /// Max ground speed, blended toward the crouched speed by crouch fraction.
    pub fn max_ground_speed(&self, is_sprinting: bool, crouch_fraction: f32) -> f32 {
        let upright = if is_sprinting {
            self.max_sprint_speed
        } else {
            self.max_walk_speed
        };
        upright + (self.max_speed_crouched - upright) * crouch_fraction
    }

    /// Standing capsule.
    pub fn capsule(&self) -> CapsuleShape {
        CapsuleShape::new(self.capsule_radius, self.capsule_half_height)
    }

    /// Crouched capsule.
    pub fn crouched_capsule(&self) -> CapsuleShape {
        CapsuleShape::new(self.capsule_radius, self.crouched_half_height)
    }

    /// Check that the configuration describes a simulatable character.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capsule_radius <= 0.0 {
            return Err(ConfigError::InvalidRadius(self.capsule_radius));
        }
        if self.capsule_half_height < self.capsule_radius {
            return Err(ConfigError::InvalidHalfHeight {
                half_height: self.capsule_half_height,
                radius: self.capsule_radius,
            });
        }
        if self.crouched_half_height < self.capsule_radius
            || self.crouched_half_height > self.capsule_half_height
        {
            return Err(ConfigError::InvalidCrouchedHalfHeight {
                crouched: self.crouched_half_height,
                radius: self.capsule_radius,
                standing: self.capsule_half_height,
            });
        }

        for (name, value) in [
            ("walkable_floor_z", self.walkable_floor_z),
            ("slidable_floor_z", self.slidable_floor_z),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::FloorZOutOfRange { name, value });
            }
        }
        if self.slidable_floor_z > self.walkable_floor_z {
            return Err(ConfigError::SlideSteeperThanWalk {
                slidable: self.slidable_floor_z,
                walkable: self.walkable_floor_z,
            });
        }
        // Slide gravity scales by 1 / (1 - slidable_floor_z).
        if self.slidable_floor_z >= 1.0 {
            return Err(ConfigError::FloorZOutOfRange {
                name: "slidable_floor_z",
                value: self.slidable_floor_z,
            });
        }

        for (name, value) in [
            ("time_to_crouch", self.time_to_crouch),
            ("time_to_crouch_sliding", self.time_to_crouch_sliding),
        ] {
            if value <= 0.0 {
                return Err(ConfigError::NonPositiveDuration { name, value });
            }
        }

        for (name, value) in [
            ("max_step_height", self.max_step_height),
            ("walk_acceleration", self.walk_acceleration),
            ("braking_deceleration_walking", self.braking_deceleration_walking),
            ("max_walk_speed", self.max_walk_speed),
            ("max_sprint_speed", self.max_sprint_speed),
            ("max_speed_crouched", self.max_speed_crouched),
            ("max_air_speed", self.max_air_speed),
            ("max_air_strafe", self.max_air_strafe),
            ("air_acceleration", self.air_acceleration),
            ("air_braking_deceleration", self.air_braking_deceleration),
            ("slide_gravity_acceleration", self.slide_gravity_acceleration),
            ("slide_braking_deceleration", self.slide_braking_deceleration),
            ("slide_lateral_acceleration", self.slide_lateral_acceleration),
            ("jump_grace_period", self.jump_grace_period),
        ] {
            if value < 0.0 {
                return Err(ConfigError::Negative { name, value });
            }
        }

        Ok(())
    }
}

fn angle_from_z(z: f32) -> f32 {
    z.clamp(-1.0, 1.0).acos().to_degrees()
}

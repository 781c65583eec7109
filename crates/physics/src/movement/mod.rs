//! Character movement physics system.
//!
//! This module implements a three-mode kinematic character controller:
//!
//! - Walking on floors up to a walkable slope, with ramps and step-ups
//! - Falling with gravity and limited air control
//! - Crouch-sliding down slidable slopes
//! - Jumping, crouching, and sprinting
//! - Collide-and-slide against arbitrary geometry
//!
//! # Design
//!
//! Movement is controlled by the [`CharacterController`] which takes input
//! commands and updates the character's [`MovementState`] through a
//! [`CollisionQuery`](crate::collision::CollisionQuery) implementation.
//! Each update returns the [`MovementEvent`]s it produced.
//!
//! The velocity models ([`calculate_ground_velocity`],
//! [`calculate_fall_velocity`], [`calculate_slide_velocity`]) are pure
//! functions of the config, current velocity and input, so they can be
//! tested and tuned without a world.

mod air;
mod config;
mod controller;
mod crouch;
mod events;
mod floor;
mod ground;
mod jump;
mod mode;
mod slide;
mod slide_move;
mod state;
mod step_up;
mod vector;
mod volume;

pub use air::{calculate_fall_velocity, AirControl};
pub use config::{MovementConfig, MAX_FLOOR_DIST, MIN_FLOOR_DIST};
pub use controller::CharacterController;
pub use events::MovementEvent;
pub use floor::{is_walkable_surface, is_within_edge_tolerance, FloorFinder, FloorResult};
pub use ground::{calculate_ground_velocity, project_onto_ramp};
pub use slide::{calculate_slide_velocity, can_slide_on_surface};
pub use slide_move::{clip_velocity, compute_slide_vector, two_wall_adjust};
pub use state::{CommandButtons, CrouchState, MovementMode, MovementState, PlayerCommand};
pub use step_up::StepDownResult;
pub use volume::{GravitySource, PhysicsVolume};

//! First-Person Character Physics
//!
//! A per-tick kinematic character controller for first-person games: a
//! capsule that walks, falls and crouch-slides through static geometry.
//!
//! # Architecture
//!
//! The crate is split into two main systems:
//!
//! - **Collision**: Sweeps capsules and traces rays through the world, returns hit information
//! - **Movement**: Uses those queries to implement walking, falling and sliding
//!
//! # Units
//!
//! Z is up, distances are in centimetres and time in seconds. Character
//! positions are capsule centers.
//!
//! # Design Principles
//!
//! 1. **Explicit state**: The controller is stateless; all per-character data lives in `MovementState`
//! 2. **Pluggable world**: Movement only talks to geometry through `CollisionQuery`
//! 3. **Events, not callbacks**: Each update returns what happened, in order
//! 4. **Never fails mid-tick**: Geometric edge cases are resolved by policy, not errors

pub mod collision;
pub mod error;
pub mod movement;

// Re-export commonly used types
pub use collision::{
    CapsuleShape, CollisionQuery, CollisionWorld, ContentFlags, HitResult, ObjectId, QueryFilter,
    SurfaceFlags,
};
pub use error::{ConfigError, WorldError};
pub use movement::{
    CharacterController, CommandButtons, FloorResult, GravitySource, MovementConfig,
    MovementEvent, MovementMode, MovementState, PhysicsVolume, PlayerCommand, StepDownResult,
};

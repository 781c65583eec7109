//! Notifications produced by a movement update.

use serde::{Deserialize, Serialize};

use crate::collision::HitResult;

use super::state::MovementMode;

/// Something the host should react to, in the order it happened.
///
/// [`CharacterController::update`](super::CharacterController::update)
/// returns these instead of calling back into the owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MovementEvent {
    /// The movement mode changed.
    ModeChanged {
        from: MovementMode,
        to: MovementMode,
    },
    /// The character reached a walkable floor. Jump charges were reset.
    Landed { hit: HitResult },
    /// The character jumped and spent a jump charge.
    Jumped,
    /// The capsule switched between standing and crouched size.
    CrouchChanged { crouched: bool },
    /// Crouch progress moved, so the eye height needs recomputing.
    EyeHeightChanged { crouch_fraction: f32, eye_height: f32 },
    /// The capsule ran into something while moving.
    Impact { hit: HitResult },
}
